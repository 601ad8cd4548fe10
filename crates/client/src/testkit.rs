//! In-memory backend for exercising workflows without a server.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use wms_core::{LocationId, ProductId};
use wms_inventory::{Direction, LocationRef, StockStatus, TransactionRequest};
use wms_products::ProductRef;

use crate::backend::{InventoryBackend, TransactionReceipt};
use crate::error::ClientError;

#[derive(Default)]
struct Inner {
    products: HashMap<String, ProductRef>,
    locations: Vec<LocationRef>,
    statuses: Vec<StockStatus>,
    counts: HashMap<(ProductId, LocationId), i64>,
    transactions: Vec<(Direction, TransactionRequest)>,
    count_requests: Vec<(ProductId, LocationId)>,
    failing_counts: bool,
    failing_master_data: bool,
    transaction_failures: VecDeque<ClientError>,
    held_counts: HashMap<LocationId, Arc<Notify>>,
    held_transactions: Option<Arc<Notify>>,
    next_transaction_id: i64,
}

/// Shared, cloneable fake. Recorded transactions are applied to the
/// stored counts the way the real backend would.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<Inner>>,
    request_started: Arc<Notify>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut inner)
    }

    pub fn add_product(&self, product: ProductRef) -> &Self {
        self.with(|i| i.products.insert(product.code.clone(), product));
        self
    }

    pub fn add_location(&self, location: LocationRef) -> &Self {
        self.with(|i| i.locations.push(location));
        self
    }

    pub fn add_status(&self, status: StockStatus) -> &Self {
        self.with(|i| i.statuses.push(status));
        self
    }

    pub fn set_count(&self, product: ProductId, location: LocationId, count: i64) -> &Self {
        self.with(|i| i.counts.insert((product, location), count));
        self
    }

    pub fn count(&self, product: ProductId, location: LocationId) -> i64 {
        self.with(|i| i.counts.get(&(product, location)).copied().unwrap_or(0))
    }

    /// Make every `system_count` call fail until turned off.
    pub fn fail_counts(&self, failing: bool) {
        self.with(|i| i.failing_counts = failing);
    }

    /// Make list endpoints fail until turned off.
    pub fn fail_master_data(&self, failing: bool) {
        self.with(|i| i.failing_master_data = failing);
    }

    /// Queue an error for the next `record_transaction` call.
    pub fn fail_next_transaction(&self, error: ClientError) {
        self.with(|i| i.transaction_failures.push_back(error));
    }

    /// Block count lookups for `location` until the returned handle is notified.
    pub fn hold_counts_for(&self, location: LocationId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.with(|i| i.held_counts.insert(location, gate.clone()));
        gate
    }

    /// Block transaction posts until the returned handle is notified.
    pub fn hold_transactions(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.with(|i| i.held_transactions = Some(gate.clone()));
        gate
    }

    /// Resolves once a held request has reached the backend.
    pub async fn request_started(&self) {
        self.request_started.notified().await;
    }

    pub fn transactions(&self) -> Vec<(Direction, TransactionRequest)> {
        self.with(|i| i.transactions.clone())
    }

    pub fn count_requests(&self) -> Vec<(ProductId, LocationId)> {
        self.with(|i| i.count_requests.clone())
    }
}

#[async_trait]
impl InventoryBackend for FakeBackend {
    async fn product_by_code(&self, code: &str) -> Result<ProductRef, ClientError> {
        self.with(|i| i.products.get(code).cloned())
            .ok_or_else(|| ClientError::NotFound(format!("product with code '{code}'")))
    }

    async fn list_locations(&self) -> Result<Vec<LocationRef>, ClientError> {
        self.with(|i| {
            if i.failing_master_data {
                Err(ClientError::Network("connection refused".to_string()))
            } else {
                Ok(i.locations.clone())
            }
        })
    }

    async fn list_stock_statuses(&self) -> Result<Vec<StockStatus>, ClientError> {
        self.with(|i| {
            if i.failing_master_data {
                Err(ClientError::Network("connection refused".to_string()))
            } else {
                Ok(i.statuses.clone())
            }
        })
    }

    async fn system_count(
        &self,
        product_id: ProductId,
        location_id: LocationId,
    ) -> Result<i64, ClientError> {
        let gate = self.with(|i| {
            i.count_requests.push((product_id, location_id));
            i.held_counts.remove(&location_id)
        });
        if let Some(gate) = gate {
            self.request_started.notify_one();
            gate.notified().await;
        }

        self.with(|i| {
            if i.failing_counts {
                return Err(ClientError::Api {
                    status: 500,
                    message: "stock query failed".to_string(),
                });
            }
            Ok(i.counts.get(&(product_id, location_id)).copied().unwrap_or(0))
        })
    }

    async fn record_transaction(
        &self,
        direction: Direction,
        request: &TransactionRequest,
    ) -> Result<TransactionReceipt, ClientError> {
        let gate = self.with(|i| i.held_transactions.take());
        if let Some(gate) = gate {
            self.request_started.notify_one();
            gate.notified().await;
        }

        self.with(|i| {
            if let Some(err) = i.transaction_failures.pop_front() {
                return Err(err);
            }
            for item in &request.items {
                let delta = i64::try_from(item.quantity).unwrap_or(i64::MAX);
                let entry = i.counts.entry((item.product_id, item.location_id)).or_insert(0);
                match direction {
                    Direction::In => *entry += delta,
                    Direction::Out => *entry -= delta,
                }
            }
            i.transactions.push((direction, request.clone()));
            i.next_transaction_id += 1;
            Ok(TransactionReceipt {
                message: Some("Transaction recorded".to_string()),
                id: Some(i.next_transaction_id),
            })
        })
    }
}
