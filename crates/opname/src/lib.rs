//! Stock opname: physical count reconciliation.
//!
//! One cycle is scan → lookup → compare → compute variance → submit an
//! adjustment. [`OpnameWorkflow`] owns the transient state of a cycle and
//! drives the [`LookupClient`] and [`AdjustmentSubmitter`] against any
//! [`wms_client::InventoryBackend`].

pub mod lookup;
pub mod notify;
pub mod state;
pub mod submitter;
pub mod workflow;

pub use lookup::{LookupClient, LookupError, MasterData};
pub use notify::{Level, Notification, NotificationLog, Notifier};
pub use state::{Focus, OpnameSnapshot, Phase};
pub use submitter::{AdjustmentSubmitter, SubmitError, SubmittedAdjustment};
pub use workflow::{OpnameWorkflow, SubmitOutcome, WorkflowError};
