//! Wiring shared by the entry points: build clients from config, retrieve,
//! then hand the records to a sink.

use std::time::Duration;

use ai_client::{AiClient, AiError};
use sheets_client::{ServiceAccountKey, SheetsClient, SheetsError};
use tracing::info;

use crate::config::{SheetConfig, UpstreamConfig};
use crate::domain::DomainConfig;
use crate::error::SinkError;
use crate::fetcher::{BatchFetcher, FetcherSettings};
use crate::retrieval::Retriever;
use crate::sink::{RecordSink, SheetsSink, SinkReport};

#[derive(Debug)]
pub struct SyncReport {
    pub domain: &'static str,
    pub target: u32,
    pub obtained: usize,
    pub upstream_calls: u32,
    pub sink: SinkReport,
}

pub fn ai_client(config: &UpstreamConfig) -> Result<AiClient, AiError> {
    AiClient::new(&config.api_key)
        .with_base_url(&config.base_url)
        .with_timeout(config.request_timeout)
}

pub fn fetcher_settings(config: &UpstreamConfig) -> FetcherSettings {
    FetcherSettings::new(&config.model)
}

pub fn sheets_sink(config: &SheetConfig, timeout: Duration) -> Result<SheetsSink, SheetsError> {
    let key = ServiceAccountKey::from_file(&config.credentials_path)?;
    let client = SheetsClient::new(key, &config.spreadsheet_id).with_timeout(timeout)?;
    Ok(SheetsSink::new(client))
}

/// Retrieve one domain and write whatever was obtained to `destination`.
///
/// A short retrieval is still written; only sink failures are errors.
pub async fn sync_domain<F, S>(
    retriever: &Retriever<F>,
    sink: &S,
    domain: &'static DomainConfig,
    destination: &str,
) -> Result<SyncReport, SinkError>
where
    F: BatchFetcher,
    S: RecordSink + ?Sized,
{
    let retrieval = retriever.retrieve(domain).await;
    let upstream_calls = retrieval.upstream_calls;
    let records = retrieval.into_records();

    let sink_report = sink.write(&records, destination).await?;

    info!(
        domain = domain.key,
        destination,
        obtained = records.len(),
        target = domain.target_count,
        upstream_calls,
        "Sync finished"
    );

    Ok(SyncReport {
        domain: domain.key,
        target: domain.target_count,
        obtained: records.len(),
        upstream_calls,
        sink: sink_report,
    })
}
