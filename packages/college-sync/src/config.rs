use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "sonar-pro";
pub const DEFAULT_BASE_URL: &str = ai_client::DEFAULT_BASE_URL;
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Upstream API settings.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

/// Spreadsheet destination settings.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    pub credentials_path: PathBuf,
    /// Tab override, honoured by the legacy entry point only
    pub sheet_name: Option<String>,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub upstream: UpstreamConfig,
    /// `None` for dry runs, which never touch the spreadsheet
    pub sheet: Option<SheetConfig>,
}

impl Config {
    /// Load configuration, reading a `.env` file first if present.
    pub fn from_env(require_sheet: bool) -> Result<Self, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(require_sheet, |key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(require_sheet: bool, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "REQUEST_TIMEOUT_SECS",
                        reason: format!("expected a positive number of seconds, got '{}'", raw),
                    })
                }
            },
        };

        let upstream = UpstreamConfig {
            api_key: required("PERPLEXITY_API_KEY")?,
            model: get("PERPLEXITY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("PERPLEXITY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout,
        };

        let sheet = if require_sheet {
            Some(SheetConfig {
                spreadsheet_id: required("GOOGLE_SHEET_ID")?,
                credentials_path: PathBuf::from(required("GOOGLE_APPLICATION_CREDENTIALS")?),
                sheet_name: get("SHEET_NAME"),
            })
        } else {
            None
        };

        Ok(Self { upstream, sheet })
    }
}
