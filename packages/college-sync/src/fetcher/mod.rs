//! Batch fetchers: one upstream call per rank window.
//!
//! Two variants share the prompt builder and the record parser:
//!
//! - [`StructuredFetcher`] attaches a JSON schema and parses the reply directly.
//! - [`LegacyFetcher`] asks for JSON in prose and cuts the outermost `[...]`
//!   span out of whatever comes back.

pub mod legacy;
pub mod prompts;
pub mod structured;

pub use legacy::LegacyFetcher;
pub use structured::StructuredFetcher;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainConfig;
use crate::error::{FetchError, FetchResult};
use crate::record::{sanitize_all, CollegeRecord};
use crate::window::RankWindow;

/// Issues exactly one upstream request for a rank window.
///
/// Returning fewer records than the window is wide is not an error.
#[async_trait]
pub trait BatchFetcher: Send + Sync {
    async fn fetch_batch(
        &self,
        domain: &DomainConfig,
        window: RankWindow,
    ) -> FetchResult<Vec<CollegeRecord>>;
}

/// Model settings shared by both fetcher variants.
#[derive(Debug, Clone)]
pub struct FetcherSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl FetcherSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.1,
            max_tokens: 8000,
        }
    }
}

/// Parse a JSON array of raw objects and sanitize each entry.
pub fn parse_records(json: &str) -> FetchResult<Vec<CollegeRecord>> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    match value {
        Value::Array(items) => Ok(sanitize_all(&items)),
        other => Err(FetchError::MalformedResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Use the response's first citation as the source for records that name none.
pub fn attach_citation(records: &mut [CollegeRecord], citations: &[String]) {
    let Some(first) = citations.iter().find(|c| !c.trim().is_empty()) else {
        return;
    };
    for record in records.iter_mut().filter(|r| r.source_url.is_none()) {
        record.source_url = Some(first.trim().to_string());
    }
}
