use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use wms_cli::{Cli, ConsoleNotifier};
use wms_client::HttpBackend;
use wms_opname::OpnameWorkflow;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Dev-time convenience; a missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    wms_observability::init(cli.log_format);

    let config = cli.client_config().context("invalid client configuration")?;
    let session = cli
        .token_source()
        .load()
        .context("failed to load session token")?;
    let backend = HttpBackend::new(&config, session).context("failed to build API client")?;
    tracing::info!(api_url = %config.api_url, "starting stock opname");

    let workflow = OpnameWorkflow::new(Arc::new(backend), ConsoleNotifier)
        .with_fallback_status(config.good_status_id);

    // Locations and stock statuses load before the first prompt. A failure
    // is reported and can be retried with `reload`.
    if workflow.start().await.is_err() {
        tracing::warn!("master data unavailable; use 'reload' to retry");
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    wms_cli::repl::run(&workflow, stdin, &mut std::io::stdout()).await
}
