//! Line-oriented operator loop.

use std::io::Write;
use std::ops::ControlFlow;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use wms_client::InventoryBackend;
use wms_opname::{Notifier, OpnameWorkflow, SubmitOutcome};

use crate::command::{Command, CommandError, HELP};
use crate::console::{render_locations, render_snapshot};

/// Read commands until `quit` or end of input.
///
/// Workflow failures are reported through the notifier and never end the
/// loop; only I/O errors on `out` do.
pub async fn run<B, N, R, W>(
    workflow: &OpnameWorkflow<B, N>,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    B: InventoryBackend,
    N: Notifier,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "stock opname ready; type 'help' for commands")?;
    prompt(out)?;

    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => {
                prompt(out)?;
                continue;
            }
            Err(e) => {
                writeln!(out, "{e}")?;
                prompt(out)?;
                continue;
            }
        };

        if handle(workflow, command, out).await?.is_break() {
            break;
        }
        prompt(out)?;
    }
    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> std::io::Result<()> {
    write!(out, "opname> ")?;
    out.flush()
}

async fn handle<B, N, W>(
    workflow: &OpnameWorkflow<B, N>,
    command: Command,
    out: &mut W,
) -> std::io::Result<ControlFlow<()>>
where
    B: InventoryBackend,
    N: Notifier,
    W: Write,
{
    tracing::debug!(?command, "operator command");
    match command {
        Command::Scan(code) => {
            let _ = workflow.scan(&code).await;
            writeln!(out, "{}", render_snapshot(&workflow.snapshot()))?;
        }
        Command::Location(id) => {
            let _ = workflow.select_location(id).await;
            writeln!(out, "{}", render_snapshot(&workflow.snapshot()))?;
        }
        Command::ClearLocation => {
            workflow.clear_location().await;
            writeln!(out, "{}", render_snapshot(&workflow.snapshot()))?;
        }
        Command::Count(n) => {
            workflow.enter_physical_count(n);
            writeln!(out, "{}", render_snapshot(&workflow.snapshot()))?;
        }
        Command::Reason(text) => workflow.set_reason(&text),
        Command::Submit => {
            if let Ok(SubmitOutcome::Submitted(done)) = workflow.submit().await {
                if let Some(message) = done.receipt.message {
                    writeln!(out, "  backend: {message}")?;
                }
            }
            writeln!(out, "{}", render_snapshot(&workflow.snapshot()))?;
        }
        Command::Show => writeln!(out, "{}", render_snapshot(&workflow.snapshot()))?,
        Command::Locations => writeln!(out, "{}", render_locations(&workflow.locations()))?,
        Command::Reload => {
            if workflow.start().await.is_ok() {
                writeln!(out, "{}", render_locations(&workflow.locations()))?;
            }
        }
        Command::Reset => {
            workflow.reset();
            writeln!(out, "{}", render_snapshot(&workflow.snapshot()))?;
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(ControlFlow::Break(())),
    }
    Ok(ControlFlow::Continue(()))
}
