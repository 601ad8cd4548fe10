use serde::{Deserialize, Serialize};

use wms_core::{Entity, StockStatusId};

/// Status id used for "good" stock when the backend list has no match.
pub const DEFAULT_GOOD_STATUS_ID: StockStatusId = StockStatusId::from_raw(1);

/// Quality classification of stock (good, damaged, expired, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatus {
    pub id: StockStatusId,
    pub name: String,
}

impl Entity for StockStatus {
    type Id = StockStatusId;

    fn id(&self) -> StockStatusId {
        self.id
    }
}

/// Pick the "good" status from the backend list, by name.
pub fn good_status(statuses: &[StockStatus], fallback: StockStatusId) -> StockStatusId {
    statuses
        .iter()
        .find(|s| {
            let name = s.name.trim().to_lowercase();
            name == "good" || name == "baik"
        })
        .map(|s| s.id)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(id: i64, name: &str) -> StockStatus {
        StockStatus {
            id: StockStatusId::from_raw(id),
            name: name.to_string(),
        }
    }

    #[test]
    fn finds_good_status_by_name() {
        let statuses = vec![status(4, "Damaged"), status(9, " Good ")];
        assert_eq!(good_status(&statuses, DEFAULT_GOOD_STATUS_ID), StockStatusId::from_raw(9));
    }

    #[test]
    fn falls_back_when_absent() {
        let statuses = vec![status(4, "Damaged")];
        assert_eq!(good_status(&statuses, DEFAULT_GOOD_STATUS_ID), DEFAULT_GOOD_STATUS_ID);
        assert_eq!(good_status(&[], StockStatusId::from_raw(2)), StockStatusId::from_raw(2));
    }
}
