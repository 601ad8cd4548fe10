//! Turns a non-zero variance into one directional inventory transaction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use wms_client::{ClientError, InventoryBackend, TransactionReceipt};
use wms_core::{DomainError, StockStatusId};
use wms_inventory::{AdjustmentTransaction, Direction, LocationRef};
use wms_products::ProductRef;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    AlreadySubmitting,

    #[error("no adjustment needed: {0}")]
    NoAdjustmentNeeded(DomainError),

    #[error("{}", .0.operator_message())]
    Backend(ClientError),
}

/// What was sent and what the backend answered.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedAdjustment {
    pub direction: Direction,
    pub quantity: u64,
    pub variance: i64,
    pub notes: String,
    pub receipt: TransactionReceipt,
}

pub struct AdjustmentSubmitter<B> {
    backend: Arc<B>,
    in_flight: Arc<AtomicBool>,
}

/// Releases the in-flight flag even if the submit future is dropped.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B: InventoryBackend> AdjustmentSubmitter<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit the adjustment reconciling `variance`.
    ///
    /// No deduplication happens here; a retry after a failure posts again.
    pub async fn submit(
        &self,
        product: &ProductRef,
        location: &LocationRef,
        variance: i64,
        stock_status_id: StockStatusId,
        reason: &str,
    ) -> Result<SubmittedAdjustment, SubmitError> {
        let adjustment = AdjustmentTransaction::from_variance(
            product,
            location,
            variance,
            stock_status_id,
            reason,
        )
        .map_err(SubmitError::NoAdjustmentNeeded)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::AlreadySubmitting);
        }
        let _guard = InFlight(self.in_flight.clone());

        tracing::info!(
            direction = %adjustment.direction(),
            product_id = %product.id,
            location_id = %location.id,
            quantity = adjustment.quantity(),
            variance,
            "submitting opname adjustment"
        );

        let receipt = self
            .backend
            .record_transaction(adjustment.direction(), &adjustment.to_request())
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "opname adjustment rejected");
                SubmitError::Backend(e)
            })?;

        Ok(SubmittedAdjustment {
            direction: adjustment.direction(),
            quantity: adjustment.quantity(),
            variance,
            notes: adjustment.notes().to_string(),
            receipt,
        })
    }
}
