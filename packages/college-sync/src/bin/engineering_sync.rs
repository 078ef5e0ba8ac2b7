// Legacy entry point: engineering colleges only, no prompt, free-text parsing.

use anyhow::{Context, Result};

use college_sync::sync::{ai_client, fetcher_settings, sheets_sink, sync_domain};
use college_sync::{Config, Domain, LegacyFetcher, RetrievalConfig, Retriever};

async fn run() -> Result<()> {
    let config = Config::from_env(true).context("Failed to load configuration")?;
    let sheet = config
        .sheet
        .as_ref()
        .context("Sheet configuration missing")?;

    let domain = Domain::Engineering.config();
    let destination = sheet.sheet_name.as_deref().unwrap_or(domain.sheet_name);

    let client = ai_client(&config.upstream).context("Failed to build upstream client")?;
    let retriever = Retriever::new(
        LegacyFetcher::new(client, fetcher_settings(&config.upstream)),
        RetrievalConfig::default(),
    );
    let sink = sheets_sink(sheet, config.upstream.request_timeout)
        .context("Failed to load sheet credentials")?;

    let report = sync_domain(&retriever, &sink, domain, destination)
        .await
        .context("Failed to write records")?;

    tracing::info!(
        obtained = report.obtained,
        target = report.target,
        tab = %report.sink.destination,
        "Engineering sync complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    college_sync::init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{:#}", e), "Engineering sync failed");
        std::process::exit(1);
    }
}
