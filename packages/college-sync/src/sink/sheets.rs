use async_trait::async_trait;
use sheets_client::{tab_range, SheetsClient};
use tracing::info;

use super::rows::build_rows;
use super::{RecordSink, SinkReport};
use crate::error::SinkError;
use crate::record::CollegeRecord;

/// Columns cleared before each write, wide enough for every layout.
const CLEAR_COLUMNS: &str = "A:Z";

/// Writes records into a named tab of one spreadsheet.
pub struct SheetsSink {
    client: SheetsClient,
}

impl SheetsSink {
    pub fn new(client: SheetsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordSink for SheetsSink {
    async fn write(
        &self,
        records: &[CollegeRecord],
        destination: &str,
    ) -> Result<SinkReport, SinkError> {
        let created = self.client.ensure_tab(destination).await?;

        self.client
            .clear_range(&tab_range(destination, CLEAR_COLUMNS))
            .await?;
        self.client
            .write_rows(destination, build_rows(records))
            .await?;

        info!(
            spreadsheet = self.client.spreadsheet_id(),
            tab = destination,
            rows = records.len(),
            created,
            "Records written to sheet"
        );

        Ok(SinkReport {
            destination: destination.to_string(),
            rows_written: records.len(),
            created,
        })
    }
}
