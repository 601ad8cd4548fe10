//! Transient state of one opname cycle and its derived views.

use serde::Serialize;

use wms_core::{LocationId, ProductId};
use wms_inventory::{LocationRef, compute_variance};
use wms_products::ProductRef;

/// Where the operator's cursor belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    ScanInput,
    LocationSelect,
    PhysicalCount,
    Submit,
}

/// Position in the cycle, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    ProductResolved,
    LocationSelected,
    CountEntered,
    VarianceComputed,
    Submitting,
    Error,
}

#[derive(Debug, Clone)]
pub(crate) struct OpnameState {
    pub scanned_code: String,
    pub product: Option<ProductRef>,
    pub location: Option<LocationRef>,
    pub physical_count: Option<u32>,
    pub system_count: i64,
    /// Selection `system_count` was fetched for; `None` means not fetched.
    pub counted_for: Option<(ProductId, LocationId)>,
    /// Bumped whenever the selection changes; guards against late responses.
    pub selection_epoch: u64,
    pub variance: Option<i64>,
    pub reason: String,
    pub focus: Focus,
    pub last_error: Option<String>,
}

impl Default for OpnameState {
    fn default() -> Self {
        Self {
            scanned_code: String::new(),
            product: None,
            location: None,
            physical_count: None,
            system_count: 0,
            counted_for: None,
            selection_epoch: 0,
            variance: None,
            reason: String::new(),
            focus: Focus::ScanInput,
            last_error: None,
        }
    }
}

impl OpnameState {
    pub fn selection(&self) -> Option<(ProductId, LocationId)> {
        match (&self.product, &self.location) {
            (Some(p), Some(l)) => Some((p.id, l.id)),
            _ => None,
        }
    }

    /// The system count belongs to the current selection.
    pub fn count_is_current(&self) -> bool {
        self.selection().is_some() && self.counted_for == self.selection()
    }

    /// Forget the system count so the next reconcile fetches it again.
    pub fn invalidate_count(&mut self) {
        self.counted_for = None;
        self.selection_epoch = self.selection_epoch.wrapping_add(1);
    }

    /// Bring derived fields in line with the inputs.
    pub fn recompute(&mut self) {
        if self.selection().is_none() || self.counted_for != self.selection() {
            self.system_count = 0;
            self.counted_for = None;
        }
        self.variance = self
            .physical_count
            .map(|physical| compute_variance(i64::from(physical), self.system_count));
    }

    /// Clear every cycle field and hand focus back to the scanner.
    pub fn reset(&mut self) {
        let epoch = self.selection_epoch.wrapping_add(1);
        *self = Self {
            selection_epoch: epoch,
            ..Self::default()
        };
    }

    pub fn phase(&self, submitting: bool) -> Phase {
        if submitting {
            return Phase::Submitting;
        }
        if self.last_error.is_some() {
            return Phase::Error;
        }
        match (&self.product, &self.location, self.physical_count) {
            (None, _, _) => Phase::Idle,
            (Some(_), None, None) => Phase::ProductResolved,
            (Some(_), Some(_), None) => Phase::LocationSelected,
            (Some(_), None, Some(_)) => Phase::CountEntered,
            (Some(_), Some(_), Some(_)) if self.count_is_current() => Phase::VarianceComputed,
            (Some(_), Some(_), Some(_)) => Phase::LocationSelected,
        }
    }

    pub fn can_submit(&self, submitting: bool) -> bool {
        !submitting
            && self.count_is_current()
            && matches!(self.variance, Some(v) if v != 0)
    }

    pub fn snapshot(&self, submitting: bool) -> OpnameSnapshot {
        OpnameSnapshot {
            phase: self.phase(submitting),
            focus: self.focus,
            scanned_code: self.scanned_code.clone(),
            product: self.product.clone(),
            location: self.location.clone(),
            physical_count: self.physical_count,
            system_count: self.system_count,
            variance: self.variance,
            reason: self.reason.clone(),
            can_submit: self.can_submit(submitting),
            is_submitting: submitting,
            last_error: self.last_error.clone(),
        }
    }
}

/// Read-only view of the workflow for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpnameSnapshot {
    pub phase: Phase,
    pub focus: Focus,
    pub scanned_code: String,
    pub product: Option<ProductRef>,
    pub location: Option<LocationRef>,
    pub physical_count: Option<u32>,
    pub system_count: i64,
    pub variance: Option<i64>,
    pub reason: String,
    pub can_submit: bool,
    pub is_submitting: bool,
    pub last_error: Option<String>,
}
