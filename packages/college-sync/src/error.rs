//! Typed errors for the sync pipeline.

use ai_client::AiError;
use sheets_client::SheetsError;
use thiserror::Error;

/// Failure of a single batch fetch. Both kinds are retried by the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, timeout or non-success status from the upstream
    #[error("transport error: {0}")]
    Transport(String),

    /// Upstream content was not a JSON array of objects
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<AiError> for FetchError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Parse(msg) => FetchError::MalformedResponse(msg),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

/// Startup configuration errors. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Errors raised while persisting records.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("spreadsheet error: {0}")]
    Sheets(#[from] SheetsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_map_to_malformed() {
        let err: FetchError = AiError::Parse("expected value".into()).into();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[test]
    fn test_status_errors_map_to_transport_with_payload() {
        let err: FetchError = AiError::Api {
            status: 429,
            message: "Too many requests".into(),
        }
        .into();

        match err {
            FetchError::Transport(msg) => assert!(msg.contains("Too many requests")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
