//! Product reference data as seen by warehouse workflows.
//!
//! Products are owned by the backend; the client only looks them up by
//! their scannable code and carries the result around unchanged.

pub mod code;
pub mod product;

pub use code::ScannedCode;
pub use product::{Pricing, ProductRef};
