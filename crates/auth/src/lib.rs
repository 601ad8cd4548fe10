//! `wms-auth`: the client's view of an authenticated session.
//!
//! Tokens are issued by an external service; this crate only carries an
//! already-issued bearer token around as an explicit value, so nothing in
//! the workspace reads credentials from global state.

pub mod session;
pub mod source;

pub use session::{Session, SessionToken};
pub use source::{SessionError, TokenSource};
