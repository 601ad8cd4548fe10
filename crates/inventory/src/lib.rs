//! Inventory rules used by the stock-opname workflow.
//!
//! Pure, deterministic logic only (no IO, no HTTP): locations and stock
//! statuses as reference data, the variance calculator, and the adjustment
//! transaction built from a variance.

pub mod adjustment;
pub mod capacity;
pub mod location;
pub mod status;
pub mod variance;

pub use adjustment::{AdjustmentTransaction, TransactionItem, TransactionRequest, compose_notes};
pub use capacity::{CapacityError, check_capacity};
pub use location::LocationRef;
pub use status::{DEFAULT_GOOD_STATUS_ID, StockStatus, good_status};
pub use variance::{Direction, compute_variance};
