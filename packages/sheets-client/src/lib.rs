//! Pure Google Sheets v4 REST client.
//!
//! A minimal client covering what a tab-overwrite sync needs: inspect the
//! spreadsheet's tabs, add a tab, clear a range and write rows.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheets_client::{ServiceAccountKey, SheetsClient};
//!
//! let key = ServiceAccountKey::from_file("credentials.json")?;
//! let client = SheetsClient::new(key, spreadsheet_id)
//!     .with_timeout(Duration::from_secs(60))?;
//!
//! client.ensure_tab("Engineering").await?;
//! client.write_rows("Engineering", rows).await?;
//! ```

pub mod auth;
pub mod error;
pub mod types;

pub use auth::ServiceAccountKey;
pub use error::{Result, SheetsError};
pub use types::{tab_range, Spreadsheet, UpdateValuesResponse};

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use types::{BatchUpdateRequest, ValueRange};

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct SheetsClient {
    client: Client,
    key: ServiceAccountKey,
    spreadsheet_id: String,
    token: OnceCell<String>,
}

impl SheetsClient {
    pub fn new(key: ServiceAccountKey, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            key,
            spreadsheet_id: spreadsheet_id.into(),
            token: OnceCell::new(),
        }
    }

    /// Bound every request, token exchange included, by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Access token, fetched on first use and reused for the client's lifetime.
    async fn access_token(&self) -> Result<&str> {
        self.token
            .get_or_try_init(|| {
                auth::fetch_access_token(&self.client, &self.key, auth::SPREADSHEETS_SCOPE)
            })
            .await
            .map(String::as_str)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let token = self.access_token().await?;
        let resp = request.bearer_auth(token).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<types::ErrorEnvelope>(&body)
                .map(|env| env.error.message)
                .unwrap_or(body);
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json()
            .await
            .map_err(|e| SheetsError::Parse(e.to_string()))
    }

    /// Fetch tab metadata.
    pub async fn get_spreadsheet(&self) -> Result<Spreadsheet> {
        let url = format!(
            "{}/{}?fields=sheets.properties",
            BASE_URL, self.spreadsheet_id
        );
        self.send(self.client.get(&url)).await
    }

    /// Add a tab with the given title.
    pub async fn add_tab(&self, title: &str) -> Result<()> {
        let url = format!("{}/{}:batchUpdate", BASE_URL, self.spreadsheet_id);
        let _: serde_json::Value = self
            .send(self.client.post(&url).json(&BatchUpdateRequest::add_sheet(title)))
            .await?;
        tracing::info!(tab = title, "Created sheet tab");
        Ok(())
    }

    /// Add the tab unless it already exists. Returns `true` when it was created.
    pub async fn ensure_tab(&self, title: &str) -> Result<bool> {
        let spreadsheet = self.get_spreadsheet().await?;
        if spreadsheet.has_tab(title) {
            tracing::debug!(tab = title, "Sheet tab already exists");
            return Ok(false);
        }
        self.add_tab(title).await?;
        Ok(true)
    }

    /// Clear every value in an A1 range.
    pub async fn clear_range(&self, range: &str) -> Result<()> {
        let url = format!(
            "{}/{}/values/{}:clear",
            BASE_URL,
            self.spreadsheet_id,
            urlencoding::encode(range)
        );
        let _: serde_json::Value = self
            .send(self.client.post(&url).json(&serde_json::json!({})))
            .await?;
        Ok(())
    }

    /// Write rows into a tab starting at `A1`, values stored as-is.
    pub async fn write_rows(
        &self,
        title: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<UpdateValuesResponse> {
        let range = tab_range(title, "A1");
        let url = format!(
            "{}/{}/values/{}?valueInputOption=RAW",
            BASE_URL,
            self.spreadsheet_id,
            urlencoding::encode(&range)
        );
        let body = ValueRange {
            range,
            major_dimension: "ROWS",
            values: rows,
        };

        let resp: UpdateValuesResponse = self.send(self.client.put(&url).json(&body)).await?;
        tracing::info!(
            tab = title,
            rows = resp.updated_rows,
            cells = resp.updated_cells,
            "Wrote sheet values"
        );
        Ok(resp)
    }
}
