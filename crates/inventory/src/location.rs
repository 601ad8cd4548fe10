use serde::{Deserialize, Serialize};

use wms_core::{Entity, LocationId, ValueObject, lenient_decimal};

/// A storage location as listed by the backend.
///
/// Capacity fields are only present for locations with a volume limit and,
/// like prices, may arrive as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: LocationId,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub capacity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub used_capacity: Option<f64>,
}

impl LocationRef {
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            capacity: None,
            used_capacity: None,
        }
    }

    /// Remaining volume, or `None` when the location is unbounded.
    pub fn remaining_capacity(&self) -> Option<f64> {
        self.capacity
            .map(|cap| (cap - self.used_capacity.unwrap_or(0.0)).max(0.0))
    }
}

impl Entity for LocationRef {
    type Id = LocationId;

    fn id(&self) -> LocationId {
        self.id
    }
}

impl ValueObject for LocationRef {}
