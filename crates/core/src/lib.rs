//! `wms-core`: shared building blocks for the warehouse client.
//!
//! Typed identifiers, the domain error model and the small entity/value
//! object markers. No IO lives here.

pub mod decimal;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use decimal::lenient_decimal;
pub use entity::{Entity, find_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{LocationId, ProductId, StockStatusId};
pub use value_object::ValueObject;
