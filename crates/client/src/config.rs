//! Client configuration.

use std::time::Duration;

use reqwest::Url;

use wms_core::StockStatusId;
use wms_inventory::DEFAULT_GOOD_STATUS_ID;

use crate::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api_url: Url,
    /// Per-request timeout; `None` waits for as long as the backend takes.
    pub timeout: Option<Duration>,
    /// Stock status used when the backend list has no "good" entry.
    pub good_status_id: StockStatusId,
}

impl ClientConfig {
    pub fn new(api_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            timeout: None,
            good_status_id: DEFAULT_GOOD_STATUS_ID,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_good_status_id(mut self, id: StockStatusId) -> Self {
        self.good_status_id = id;
        self
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ClientError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClientError::Config("api url cannot be empty".to_string()));
    }
    let url = Url::parse(raw).map_err(|e| ClientError::Config(format!("api url '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::Config(format!(
            "api url must use http or https, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_base_urls() {
        let cfg = ClientConfig::new(" https://wms.example.com/api ").unwrap();
        assert_eq!(cfg.api_url.as_str(), "https://wms.example.com/api");
        assert_eq!(cfg.timeout, None);
        assert_eq!(cfg.good_status_id, DEFAULT_GOOD_STATUS_ID);

        let cfg = ClientConfig::new(DEFAULT_API_URL)
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn rejects_empty_and_non_http_urls() {
        assert!(matches!(ClientConfig::new(""), Err(ClientError::Config(_))));
        assert!(matches!(ClientConfig::new("ftp://host/api"), Err(ClientError::Config(_))));
        assert!(matches!(ClientConfig::new("not a url"), Err(ClientError::Config(_))));
    }
}
