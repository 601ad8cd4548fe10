use serde::{Deserialize, Serialize};

use wms_core::{Entity, ProductId, ValueObject, lenient_decimal};

/// Last-known default pricing of a product.
///
/// The backend stores prices as SQL decimals, which arrive either as JSON
/// numbers or as strings depending on the driver; both are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub selling_price: Option<f64>,
}

/// A product as resolved from its scannable code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    #[serde(alias = "sku")]
    pub code: String,
    pub name: String,
    #[serde(flatten)]
    pub pricing: Pricing,
}

impl ProductRef {
    /// Label used in operator-facing messages, e.g. `Widget (SKU123)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

impl Entity for ProductRef {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

impl ValueObject for ProductRef {}
