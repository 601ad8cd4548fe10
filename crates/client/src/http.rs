//! reqwest-backed implementation of [`InventoryBackend`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use wms_auth::Session;
use wms_core::{LocationId, ProductId};
use wms_inventory::{Direction, LocationRef, StockStatus, TransactionRequest};
use wms_products::ProductRef;

use crate::backend::{InventoryBackend, TransactionReceipt};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::interceptor::{BearerAuth, RequestId, RequestInterceptor};

/// HTTP client for the warehouse REST API.
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base: Url,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl HttpBackend {
    /// Build a client that authenticates every request with `session`.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ClientError> {
        Ok(Self::unauthenticated(config)?
            .with_interceptor(BearerAuth::new(session))
            .with_interceptor(RequestId))
    }

    /// Build a client without credentials (health checks, tests).
    pub fn unauthenticated(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        if config.api_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "api url '{}' cannot carry a path",
                config.api_url
            )));
        }

        Ok(Self {
            http,
            base: config.api_url.clone(),
            interceptors: Vec::new(),
        })
    }

    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Config(format!("api url '{}' cannot carry a path", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.interceptors
            .iter()
            .fold(self.http.request(method, url), |req, i| i.intercept(req))
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&TransactionRequest>,
    ) -> Result<Response, ClientError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "backend request");

        let mut req = self.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;

        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(api_error(resp).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let resp = self.send(Method::GET, segments, None).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

impl core::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base", &self.base.as_str())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

#[async_trait]
impl InventoryBackend for HttpBackend {
    async fn product_by_code(&self, code: &str) -> Result<ProductRef, ClientError> {
        match self.get_json(&["products", "by-code", code]).await {
            Err(ClientError::Api { status, message })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                tracing::debug!(code, %message, "product code not found");
                Err(ClientError::NotFound(format!("product with code '{code}'")))
            }
            other => other,
        }
    }

    async fn list_locations(&self) -> Result<Vec<LocationRef>, ClientError> {
        let body: ListBody<LocationRef> = self.get_json(&["locations"]).await?;
        Ok(body.into_items())
    }

    async fn list_stock_statuses(&self) -> Result<Vec<StockStatus>, ClientError> {
        let body: ListBody<StockStatus> = self.get_json(&["stock-statuses"]).await?;
        Ok(body.into_items())
    }

    async fn system_count(
        &self,
        product_id: ProductId,
        location_id: LocationId,
    ) -> Result<i64, ClientError> {
        let product = product_id.to_string();
        let location = location_id.to_string();
        let body: SystemCountBody = self
            .get_json(&["stocks", "specific", &product, &location])
            .await?;
        body.system_count.into_count()
    }

    async fn record_transaction(
        &self,
        direction: Direction,
        request: &TransactionRequest,
    ) -> Result<TransactionReceipt, ClientError> {
        let resp = self
            .send(Method::POST, &["transactions", direction.as_str()], Some(request))
            .await?;

        // Some handlers answer 201 with an empty body.
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(TransactionReceipt::default());
        }
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

/// List endpoints answer either a bare array or `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) | ListBody::Wrapped { data: items } => items,
        }
    }
}

#[derive(Deserialize)]
struct SystemCountBody {
    #[serde(default)]
    system_count: RawCount,
}

/// Aggregated quantities may come back as SQL numerics encoded as strings.
#[derive(Deserialize, Default)]
#[serde(untagged)]
enum RawCount {
    Int(i64),
    Float(f64),
    Text(String),
    #[default]
    Null,
}

impl RawCount {
    fn into_count(self) -> Result<i64, ClientError> {
        match self {
            RawCount::Int(n) => Ok(n),
            RawCount::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
            RawCount::Float(f) => Err(ClientError::Parse(format!(
                "system_count {f} is not a whole number"
            ))),
            RawCount::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .or_else(|_| match s.parse::<f64>() {
                        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
                        _ => Err(()),
                    })
                    .map_err(|_| {
                        ClientError::Parse(format!("system_count '{s}' is not a whole number"))
                    })
            }
            RawCount::Null => Ok(0),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

async fn api_error(resp: Response) -> ClientError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    tracing::warn!(status = status.as_u16(), %message, "backend rejected request");
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::unauthenticated(&ClientConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn endpoint_appends_and_encodes_segments() {
        let b = backend("http://localhost:5000/api/");
        let url = b.endpoint(&["products", "by-code", "A B/1"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/products/by-code/A%20B%2F1");

        let b = backend("http://localhost:5000");
        let url = b.endpoint(&["locations"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/locations");
    }

    #[test]
    fn system_count_accepts_numeric_strings_and_null() {
        let parse = |json: &str| {
            serde_json::from_str::<SystemCountBody>(json)
                .unwrap()
                .system_count
                .into_count()
        };
        assert_eq!(parse(r#"{"system_count": 50}"#), Ok(50));
        assert_eq!(parse(r#"{"system_count": "50"}"#), Ok(50));
        assert_eq!(parse(r#"{"system_count": "50.000"}"#), Ok(50));
        assert_eq!(parse(r#"{"system_count": null}"#), Ok(0));
        assert_eq!(parse(r#"{}"#), Ok(0));
        assert!(matches!(parse(r#"{"system_count": 1.5}"#), Err(ClientError::Parse(_))));
    }

    #[test]
    fn list_body_accepts_bare_and_wrapped_arrays() {
        let bare: ListBody<StockStatus> =
            serde_json::from_str(r#"[{"id":1,"name":"Good"}]"#).unwrap();
        let wrapped: ListBody<StockStatus> =
            serde_json::from_str(r#"{"data":[{"id":1,"name":"Good"}]}"#).unwrap();
        assert_eq!(bare.into_items(), wrapped.into_items());
    }
}
