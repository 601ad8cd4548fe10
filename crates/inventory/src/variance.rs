//! Variance between a physical count and the system-recorded quantity.

use serde::{Deserialize, Serialize};

/// Signed difference `physical - system`.
///
/// Positive means more stock on the shelf than on record (an increase is
/// needed), negative means stock is missing.
pub fn compute_variance(physical: i64, system: i64) -> i64 {
    physical.saturating_sub(system)
}

/// Direction of an inventory transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Stock increase (`POST /transactions/in`).
    In,
    /// Stock decrease (`POST /transactions/out`).
    Out,
}

impl Direction {
    /// Direction that reconciles `variance`; `None` when nothing is off.
    pub fn for_variance(variance: i64) -> Option<Self> {
        match variance {
            0 => None,
            v if v > 0 => Some(Self::In),
            _ => Some(Self::Out),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
