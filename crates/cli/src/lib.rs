//! Terminal front end for the stock-opname workflow.
//!
//! Scanner guns type a code followed by Enter, so a bare line is a scan;
//! everything else is a short keyword command.

pub mod args;
pub mod command;
pub mod console;
pub mod repl;

pub use args::Cli;
pub use command::{Command, CommandError};
pub use console::ConsoleNotifier;
