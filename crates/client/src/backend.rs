use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use wms_core::{LocationId, ProductId};
use wms_inventory::{Direction, LocationRef, StockStatus, TransactionRequest};
use wms_products::ProductRef;

use crate::ClientError;

/// What the backend says after accepting a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "transaction_id")]
    pub id: Option<i64>,
}

/// Backend operations the stock-opname workflow depends on.
#[async_trait]
pub trait InventoryBackend: Send + Sync {
    /// `GET /products/by-code/{code}`; `ClientError::NotFound` when unknown.
    async fn product_by_code(&self, code: &str) -> Result<ProductRef, ClientError>;

    /// `GET /locations`.
    async fn list_locations(&self) -> Result<Vec<LocationRef>, ClientError>;

    /// `GET /stock-statuses`.
    async fn list_stock_statuses(&self) -> Result<Vec<StockStatus>, ClientError>;

    /// `GET /stocks/specific/{product}/{location}` → recorded quantity.
    async fn system_count(
        &self,
        product_id: ProductId,
        location_id: LocationId,
    ) -> Result<i64, ClientError>;

    /// `POST /transactions/in` or `POST /transactions/out`.
    async fn record_transaction(
        &self,
        direction: Direction,
        request: &TransactionRequest,
    ) -> Result<TransactionReceipt, ClientError>;
}
