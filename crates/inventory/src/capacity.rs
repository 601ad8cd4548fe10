//! Volume check for inbound stock against a location's remaining capacity.
//!
//! Used for regular inbound transactions. Stock-opname adjustments record
//! stock that is already physically on the shelf and skip this check.

use thiserror::Error;

use crate::location::LocationRef;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CapacityError {
    #[error("location '{location}' has {remaining} volume left, {requested} requested")]
    Exceeded {
        location: String,
        remaining: f64,
        requested: f64,
    },

    #[error("requested volume must be a finite, non-negative number")]
    InvalidVolume,
}

/// Ensure `requested_volume` fits into `location`.
///
/// Locations without a configured capacity accept anything.
pub fn check_capacity(location: &LocationRef, requested_volume: f64) -> Result<(), CapacityError> {
    if !requested_volume.is_finite() || requested_volume < 0.0 {
        return Err(CapacityError::InvalidVolume);
    }
    match location.remaining_capacity() {
        Some(remaining) if requested_volume > remaining => Err(CapacityError::Exceeded {
            location: location.name.clone(),
            remaining,
            requested: requested_volume,
        }),
        _ => Ok(()),
    }
}
