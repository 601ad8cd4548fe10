//! The opname cycle: scan, select, count, submit.
//!
//! Every operation mutates the cycle state under a short lock, releases it
//! before touching the backend, and finishes with [`OpnameWorkflow::reconcile`],
//! which is the only place the system count is fetched and the variance
//! recomputed.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use wms_client::{ClientError, InventoryBackend};
use wms_core::{LocationId, StockStatusId, find_by_id};
use wms_inventory::{DEFAULT_GOOD_STATUS_ID, LocationRef};
use wms_products::ProductRef;

use crate::lookup::{LookupClient, LookupError, MasterData};
use crate::notify::{Level, Notification, Notifier};
use crate::state::{Focus, OpnameSnapshot, OpnameState};
use crate::submitter::{AdjustmentSubmitter, SubmitError, SubmittedAdjustment};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("master data not loaded yet")]
    NotReady,

    #[error("a submission is in progress")]
    Busy,

    #[error("unknown location {0}")]
    UnknownLocation(LocationId),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("{}", .0.operator_message())]
    Submit(ClientError),
}

/// Result of a submit attempt that did not fail at the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(SubmittedAdjustment),
    /// Physical and system counts agree; nothing was sent.
    NoAdjustmentNeeded,
    /// Product, location, count or a fresh system count is missing.
    Incomplete,
    AlreadySubmitting,
}

pub struct OpnameWorkflow<B, N> {
    lookup: LookupClient<B>,
    submitter: AdjustmentSubmitter<B>,
    notifier: N,
    state: Mutex<OpnameState>,
    master: Mutex<Option<MasterData>>,
    fallback_status: StockStatusId,
}

impl<B: InventoryBackend, N: Notifier> OpnameWorkflow<B, N> {
    pub fn new(backend: Arc<B>, notifier: N) -> Self {
        Self {
            lookup: LookupClient::new(backend.clone()),
            submitter: AdjustmentSubmitter::new(backend),
            notifier,
            state: Mutex::new(OpnameState::default()),
            master: Mutex::new(None),
            fallback_status: DEFAULT_GOOD_STATUS_ID,
        }
    }

    /// Status id used when the backend has no status named "good".
    pub fn with_fallback_status(mut self, id: StockStatusId) -> Self {
        self.fallback_status = id;
        self
    }

    fn state(&self) -> MutexGuard<'_, OpnameState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn master(&self) -> MutexGuard<'_, Option<MasterData>> {
        self.master.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::Error => tracing::warn!(%message, "opname"),
            Level::Info | Level::Success => tracing::info!(%message, "opname"),
        }
        self.notifier.notify(Notification::new(level, message));
    }

    /// Operator input is refused while an adjustment is in flight; the
    /// successful submit would otherwise clear it.
    fn refuse_while_submitting(&self) -> bool {
        if self.submitter.is_submitting() {
            self.notify(Level::Info, "Submission in progress; input ignored");
            return true;
        }
        false
    }

    /// Load master data; the workflow accepts location input only afterwards.
    pub async fn start(&self) -> Result<(), WorkflowError> {
        match self.lookup.load_master_data().await {
            Ok(data) => {
                *self.master() = Some(data);
                Ok(())
            }
            Err(e) => {
                self.notify(Level::Error, format!("Failed to load master data: {e}"));
                Err(e.into())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.master().is_some()
    }

    pub fn locations(&self) -> Vec<LocationRef> {
        self.master()
            .as_ref()
            .map(|m| m.locations.clone())
            .unwrap_or_default()
    }

    fn good_status_id(&self) -> StockStatusId {
        self.master()
            .as_ref()
            .map(|m| m.good_status_id(self.fallback_status))
            .unwrap_or(self.fallback_status)
    }

    pub fn snapshot(&self) -> OpnameSnapshot {
        self.state().snapshot(self.submitter.is_submitting())
    }

    pub fn can_submit(&self) -> bool {
        self.state().can_submit(self.submitter.is_submitting())
    }

    /// Resolve a scanned code. On failure the product is cleared and the
    /// system count drops back to zero.
    pub async fn scan(&self, code: &str) -> Result<ProductRef, WorkflowError> {
        if self.refuse_while_submitting() {
            return Err(WorkflowError::Busy);
        }
        let code = code.trim().to_string();
        {
            let mut state = self.state();
            state.scanned_code = code.clone();
            state.last_error = None;
        }

        let resolved = self.lookup.resolve_by_code(&code).await;
        if self.refuse_while_submitting() {
            return Err(WorkflowError::Busy);
        }
        let result = {
            let mut state = self.state();
            if state.scanned_code != code {
                // A newer scan owns the state now.
                return resolved.map_err(WorkflowError::from);
            }
            match resolved {
                Ok(product) => {
                    state.product = Some(product.clone());
                    state.invalidate_count();
                    state.focus = if state.location.is_some() {
                        Focus::PhysicalCount
                    } else {
                        Focus::LocationSelect
                    };
                    Ok(product)
                }
                Err(e) => {
                    state.product = None;
                    state.focus = Focus::ScanInput;
                    state.last_error = Some(e.to_string());
                    state.recompute();
                    Err(e)
                }
            }
        };

        match &result {
            Ok(product) => {
                self.notify(Level::Success, format!("Product found: {}", product.label()))
            }
            Err(e) => self.notify(Level::Error, e.to_string()),
        }
        let product = result?;
        self.reconcile().await;
        Ok(product)
    }

    /// Select a location from the loaded master data.
    pub async fn select_location(&self, id: LocationId) -> Result<LocationRef, WorkflowError> {
        if self.refuse_while_submitting() {
            return Err(WorkflowError::Busy);
        }
        let found = self
            .master()
            .as_ref()
            .map(|data| find_by_id(&data.locations, id).cloned());
        let Some(found) = found else {
            self.notify(Level::Error, "Locations are still loading");
            return Err(WorkflowError::NotReady);
        };
        let Some(location) = found else {
            self.notify(Level::Error, format!("Unknown location {id}"));
            return Err(WorkflowError::UnknownLocation(id));
        };

        {
            let mut state = self.state();
            state.location = Some(location.clone());
            state.invalidate_count();
            state.last_error = None;
            if state.product.is_some() {
                state.focus = Focus::PhysicalCount;
            }
        }
        tracing::debug!(location_id = %id, "location selected");
        self.reconcile().await;
        Ok(location)
    }

    pub async fn clear_location(&self) {
        if self.refuse_while_submitting() {
            return;
        }
        {
            let mut state = self.state();
            state.location = None;
            state.invalidate_count();
            state.focus = Focus::LocationSelect;
        }
        self.reconcile().await;
    }

    /// Record the operator's physical count; variance follows synchronously.
    pub fn enter_physical_count(&self, count: u32) -> Option<i64> {
        if self.refuse_while_submitting() {
            return self.state().variance;
        }
        let mut state = self.state();
        state.physical_count = Some(count);
        state.last_error = None;
        state.recompute();
        if state.count_is_current() {
            state.focus = Focus::Submit;
        }
        state.variance
    }

    pub fn clear_physical_count(&self) {
        if self.refuse_while_submitting() {
            return;
        }
        let mut state = self.state();
        state.physical_count = None;
        state.recompute();
    }

    pub fn set_reason(&self, reason: &str) {
        if self.refuse_while_submitting() {
            return;
        }
        self.state().reason = reason.to_string();
    }

    /// Abandon the current cycle.
    pub fn reset(&self) {
        if self.refuse_while_submitting() {
            return;
        }
        self.state().reset();
    }

    /// Fetch the system count when the selection changed, then recompute
    /// the variance. A response for a selection that is no longer current
    /// is dropped.
    pub async fn reconcile(&self) {
        let wanted = {
            let mut state = self.state();
            state.recompute();
            match state.selection() {
                Some(key) if state.counted_for != Some(key) => Some((key, state.selection_epoch)),
                _ => None,
            }
        };
        let Some(((product_id, location_id), epoch)) = wanted else {
            return;
        };

        let fetched = self.lookup.fetch_system_count(product_id, location_id).await;

        let failure = {
            let mut state = self.state();
            if state.selection_epoch != epoch
                || state.selection() != Some((product_id, location_id))
            {
                tracing::debug!(%product_id, %location_id, "discarding stale system count");
                return;
            }
            match fetched {
                Ok(count) => {
                    state.system_count = count;
                    state.counted_for = Some((product_id, location_id));
                    state.recompute();
                    None
                }
                Err(e) => {
                    state.last_error = Some(e.to_string());
                    state.recompute();
                    Some(e)
                }
            }
        };

        if let Some(e) = failure {
            self.notify(Level::Error, format!("Failed to load system stock: {e}"));
        }
    }

    /// Submit the adjustment for the current variance.
    ///
    /// On success the cycle is cleared and focus returns to the scanner. On
    /// a backend failure the state is kept so the operator can retry.
    pub async fn submit(&self) -> Result<SubmitOutcome, WorkflowError> {
        if self.submitter.is_submitting() {
            return Ok(SubmitOutcome::AlreadySubmitting);
        }

        let ready = {
            let state = self.state();
            match (&state.product, &state.location, state.variance) {
                (Some(p), Some(l), Some(v)) if state.count_is_current() => {
                    Some((p.clone(), l.clone(), v, state.reason.clone()))
                }
                _ => None,
            }
        };
        let Some((product, location, variance, reason)) = ready else {
            self.notify(
                Level::Error,
                "Scan a product, pick a location and enter the physical count first",
            );
            return Ok(SubmitOutcome::Incomplete);
        };

        if variance == 0 {
            self.notify(Level::Info, "Counts match; no adjustment needed");
            return Ok(SubmitOutcome::NoAdjustmentNeeded);
        }

        let status = self.good_status_id();
        match self
            .submitter
            .submit(&product, &location, variance, status, &reason)
            .await
        {
            Ok(done) => {
                self.state().reset();
                self.notify(
                    Level::Success,
                    format!(
                        "Adjustment recorded: {} {} x{} at {}",
                        done.direction,
                        product.label(),
                        done.quantity,
                        location.name
                    ),
                );
                Ok(SubmitOutcome::Submitted(done))
            }
            Err(SubmitError::AlreadySubmitting) => Ok(SubmitOutcome::AlreadySubmitting),
            Err(SubmitError::NoAdjustmentNeeded(_)) => {
                self.notify(Level::Info, "Counts match; no adjustment needed");
                Ok(SubmitOutcome::NoAdjustmentNeeded)
            }
            Err(SubmitError::Backend(e)) => {
                let message = e.operator_message();
                self.state().last_error = Some(message.clone());
                self.notify(Level::Error, message);
                Err(WorkflowError::Submit(e))
            }
        }
    }
}
