use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use wms_auth::TokenSource;
use wms_client::config::DEFAULT_API_URL;
use wms_client::{ClientConfig, ClientError};
use wms_core::StockStatusId;
use wms_observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "wms-opname")]
#[command(about = "Stock opname: count, compare and reconcile warehouse stock", long_about = None)]
pub struct Cli {
    /// Base URL of the warehouse API
    #[arg(long, env = "WMS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token issued by the auth service
    #[arg(long, env = "WMS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File holding the bearer token (used when --token is absent)
    #[arg(long, env = "WMS_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long, env = "WMS_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Stock status id for "good" stock when the backend list has none
    #[arg(long, env = "WMS_GOOD_STATUS_ID", default_value_t = 1)]
    pub good_status_id: i64,

    /// Log line format on stderr (json | pretty)
    #[arg(long, env = "WMS_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn client_config(&self) -> Result<ClientConfig, ClientError> {
        if self.good_status_id <= 0 {
            return Err(ClientError::Config(format!(
                "good status id must be positive, got {}",
                self.good_status_id
            )));
        }
        let mut config = ClientConfig::new(&self.api_url)?
            .with_good_status_id(StockStatusId::from_raw(self.good_status_id));
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn token_source(&self) -> TokenSource {
        TokenSource {
            inline: self.token.clone(),
            file: self.token_file.clone(),
        }
    }
}
