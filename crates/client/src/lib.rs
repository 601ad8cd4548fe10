//! HTTP access to the warehouse backend.
//!
//! `InventoryBackend` is the seam the workflow depends on; `HttpBackend` is
//! the reqwest implementation. Credentials travel through request
//! interceptors built from an explicit `wms_auth::Session`.

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod interceptor;

#[cfg(feature = "testkit")]
pub mod testkit;

pub use backend::{InventoryBackend, TransactionReceipt};
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpBackend;
pub use interceptor::{BearerAuth, RequestId, RequestInterceptor};
