//! Product and stock lookups backing the scan step.

use std::sync::Arc;

use thiserror::Error;

use wms_client::{ClientError, InventoryBackend};
use wms_core::{DomainError, LocationId, ProductId, StockStatusId};
use wms_inventory::{LocationRef, StockStatus, good_status};
use wms_products::{ProductRef, ScannedCode};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupError {
    #[error("invalid product code: {0}")]
    InvalidCode(DomainError),

    #[error("no product found for code '{code}'")]
    NotFound { code: String },

    #[error("lookup failed: {}", .0.operator_message())]
    Backend(ClientError),
}

/// Reference data loaded once before the workflow accepts input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterData {
    pub locations: Vec<LocationRef>,
    pub statuses: Vec<StockStatus>,
}

impl MasterData {
    pub fn good_status_id(&self, fallback: StockStatusId) -> StockStatusId {
        good_status(&self.statuses, fallback)
    }
}

pub struct LookupClient<B> {
    backend: Arc<B>,
}

impl<B> Clone for LookupClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
        }
    }
}

impl<B: InventoryBackend> LookupClient<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Resolve a scanned code to a product with its default pricing.
    pub async fn resolve_by_code(&self, input: &str) -> Result<ProductRef, LookupError> {
        let code = ScannedCode::parse(input).map_err(LookupError::InvalidCode)?;
        match self.backend.product_by_code(code.as_str()).await {
            Ok(product) => {
                tracing::debug!(code = %code, product_id = %product.id, "product resolved");
                Ok(product)
            }
            Err(ClientError::NotFound(_)) => Err(LookupError::NotFound {
                code: code.as_str().to_string(),
            }),
            Err(e) => Err(LookupError::Backend(e)),
        }
    }

    /// Quantity currently on record for `product_id` at `location_id`.
    pub async fn fetch_system_count(
        &self,
        product_id: ProductId,
        location_id: LocationId,
    ) -> Result<i64, LookupError> {
        let count = self
            .backend
            .system_count(product_id, location_id)
            .await
            .map_err(LookupError::Backend)?;
        tracing::debug!(%product_id, %location_id, count, "system count fetched");
        Ok(count)
    }

    /// Load locations and stock statuses concurrently; both must succeed.
    pub async fn load_master_data(&self) -> Result<MasterData, LookupError> {
        let (locations, statuses) = tokio::try_join!(
            self.backend.list_locations(),
            self.backend.list_stock_statuses(),
        )
        .map_err(LookupError::Backend)?;
        tracing::debug!(
            locations = locations.len(),
            statuses = statuses.len(),
            "master data loaded"
        );
        Ok(MasterData {
            locations,
            statuses,
        })
    }
}

#[cfg(test)]
mod tests {
    use wms_client::testkit::FakeBackend;
    use wms_products::Pricing;

    use super::*;

    fn widget() -> ProductRef {
        ProductRef {
            id: ProductId::from_raw(7),
            code: "SKU123".to_string(),
            name: "Widget".to_string(),
            pricing: Pricing::default(),
        }
    }

    fn client(backend: &FakeBackend) -> LookupClient<FakeBackend> {
        LookupClient::new(Arc::new(backend.clone()))
    }

    #[tokio::test]
    async fn resolves_trimmed_code() {
        let backend = FakeBackend::new();
        backend.add_product(widget());

        let product = client(&backend).resolve_by_code(" SKU123\n").await.unwrap();
        assert_eq!(product, widget());
    }

    #[tokio::test]
    async fn unknown_and_blank_codes_are_distinguished() {
        let backend = FakeBackend::new();
        let lookup = client(&backend);

        assert_eq!(
            lookup.resolve_by_code("NOPE").await,
            Err(LookupError::NotFound {
                code: "NOPE".to_string()
            })
        );
        assert!(matches!(
            lookup.resolve_by_code("  ").await,
            Err(LookupError::InvalidCode(_))
        ));
    }

    #[tokio::test]
    async fn system_count_defaults_to_zero_and_surfaces_backend_failure() {
        let backend = FakeBackend::new();
        let lookup = client(&backend);
        let (p, l) = (ProductId::from_raw(7), LocationId::from_raw(1));

        assert_eq!(lookup.fetch_system_count(p, l).await, Ok(0));

        backend.fail_counts(true);
        let err = lookup.fetch_system_count(p, l).await.unwrap_err();
        assert_eq!(err.to_string(), "lookup failed: stock query failed");
    }

    #[tokio::test]
    async fn master_data_needs_both_lists() {
        let backend = FakeBackend::new();
        backend
            .add_location(LocationRef::new(LocationId::from_raw(1), "A1"))
            .add_status(StockStatus {
                id: StockStatusId::from_raw(5),
                name: "Good".to_string(),
            });

        let data = client(&backend).load_master_data().await.unwrap();
        assert_eq!(data.locations.len(), 1);
        assert_eq!(
            data.good_status_id(StockStatusId::from_raw(1)),
            StockStatusId::from_raw(5)
        );

        backend.fail_master_data(true);
        assert!(matches!(
            client(&backend).load_master_data().await,
            Err(LookupError::Backend(ClientError::Network(_)))
        ));
    }
}
