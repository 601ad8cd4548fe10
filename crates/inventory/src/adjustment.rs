//! Adjustment transactions that reconcile a counted variance.

use serde::{Deserialize, Serialize};

use wms_core::{DomainError, DomainResult, LocationId, ProductId, StockStatusId};
use wms_products::ProductRef;

use crate::location::LocationRef;
use crate::variance::Direction;

/// One line of a transaction request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionItem {
    pub product_id: ProductId,
    pub location_id: LocationId,
    pub quantity: u64,
    pub stock_status_id: StockStatusId,
    pub purchase_price: Option<f64>,
    pub selling_price: Option<f64>,
}

/// Body of `POST /transactions/{in,out}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub notes: String,
    pub items: Vec<TransactionItem>,
}

/// A directional stock adjustment built from a non-zero variance.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentTransaction {
    direction: Direction,
    variance: i64,
    item: TransactionItem,
    notes: String,
}

impl AdjustmentTransaction {
    /// Build the adjustment for `variance` of `product` at `location`.
    ///
    /// Fails when the variance is zero: there is nothing to reconcile.
    pub fn from_variance(
        product: &ProductRef,
        location: &LocationRef,
        variance: i64,
        stock_status_id: StockStatusId,
        reason: &str,
    ) -> DomainResult<Self> {
        let direction = Direction::for_variance(variance)
            .ok_or_else(|| DomainError::validation("variance is zero; no adjustment needed"))?;

        let item = TransactionItem {
            product_id: product.id,
            location_id: location.id,
            quantity: variance.unsigned_abs(),
            stock_status_id,
            purchase_price: product.pricing.purchase_price,
            selling_price: product.pricing.selling_price,
        };

        Ok(Self {
            direction,
            variance,
            item,
            notes: compose_notes(reason, variance),
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn variance(&self) -> i64 {
        self.variance
    }

    pub fn quantity(&self) -> u64 {
        self.item.quantity
    }

    pub fn item(&self) -> &TransactionItem {
        &self.item
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Request body for the transaction endpoint matching `direction()`.
    pub fn to_request(&self) -> TransactionRequest {
        TransactionRequest {
            notes: self.notes.clone(),
            items: vec![self.item.clone()],
        }
    }
}

/// Notes recorded with the adjustment: operator reason plus signed variance.
pub fn compose_notes(reason: &str, variance: i64) -> String {
    let reason = reason.trim();
    if reason.is_empty() {
        format!("Stock opname adjustment (variance {variance:+})")
    } else {
        format!("Stock opname: {reason} (variance {variance:+})")
    }
}

#[cfg(test)]
mod tests {
    use wms_products::Pricing;

    use super::*;

    fn widget() -> ProductRef {
        ProductRef {
            id: ProductId::from_raw(7),
            code: "SKU123".to_string(),
            name: "Widget".to_string(),
            pricing: Pricing {
                purchase_price: Some(1200.0),
                selling_price: Some(1500.0),
            },
        }
    }

    fn shelf() -> LocationRef {
        LocationRef::new(LocationId::from_raw(3), "A1")
    }

    #[test]
    fn negative_variance_becomes_outbound_with_absolute_quantity() {
        let adj = AdjustmentTransaction::from_variance(
            &widget(),
            &shelf(),
            -5,
            StockStatusId::from_raw(1),
            "broken box",
        )
        .unwrap();

        assert_eq!(adj.direction(), Direction::Out);
        assert_eq!(adj.quantity(), 5);
        assert_eq!(adj.notes(), "Stock opname: broken box (variance -5)");

        let body = adj.to_request();
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].product_id, ProductId::from_raw(7));
        assert_eq!(body.items[0].location_id, LocationId::from_raw(3));
        assert_eq!(body.items[0].purchase_price, Some(1200.0));
    }

    #[test]
    fn positive_variance_becomes_inbound() {
        let adj = AdjustmentTransaction::from_variance(
            &widget(),
            &shelf(),
            12,
            StockStatusId::from_raw(1),
            "",
        )
        .unwrap();
        assert_eq!(adj.direction(), Direction::In);
        assert_eq!(adj.quantity(), 12);
        assert_eq!(adj.notes(), "Stock opname adjustment (variance +12)");
    }

    #[test]
    fn zero_variance_is_rejected() {
        let err = AdjustmentTransaction::from_variance(
            &widget(),
            &shelf(),
            0,
            StockStatusId::from_raw(1),
            "recount",
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn request_body_matches_backend_shape() {
        let adj = AdjustmentTransaction::from_variance(
            &widget(),
            &shelf(),
            -1,
            StockStatusId::from_raw(2),
            "x",
        )
        .unwrap();

        let json = serde_json::to_value(adj.to_request()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "notes": "Stock opname: x (variance -1)",
                "items": [{
                    "product_id": 7,
                    "location_id": 3,
                    "quantity": 1,
                    "stock_status_id": 2,
                    "purchase_price": 1200.0,
                    "selling_price": 1500.0
                }]
            })
        );
    }
}
