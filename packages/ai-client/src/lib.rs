//! Provider-agnostic chat completion client
//!
//! A minimal client for OpenAI-compatible `/chat/completions` endpoints
//! (Perplexity, OpenAI, proxies). Supports plain chat completions and
//! structured outputs constrained by a JSON schema.
//!
//! # Example
//!
//! ```rust,ignore
//! use ai_client::{AiClient, ChatRequest, Message};
//!
//! let client = AiClient::new(api_key)
//!     .with_base_url("https://api.perplexity.ai")
//!     .with_timeout(Duration::from_secs(90))?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("sonar-pro").message(Message::user("Hello!"))
//! ).await?;
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{AiError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

/// Chat completion API client.
#[derive(Clone)]
pub struct AiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl AiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL (OpenAI, Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AiError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Returns the first choice's content along with any citations.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, model = %request.model, "Chat completion request failed");
                AiError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = provider_message(&error_text);
            warn!(status = %status, error = %message, "Chat completion API error");
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(AiError::from)?;
        let chat_response: types::ChatResponseRaw = serde_json::from_str(&body)
            .map_err(|e| AiError::Parse(format!("Unexpected response body: {}", e)))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::Parse("Response contained no message content".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            content_len = content.len(),
            citations = chat_response.citations.len(),
            "Chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
            citations: chat_response.citations,
        })
    }
}

/// Pull the human-readable message out of a provider error body, falling back
/// to the raw text.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<types::ErrorEnvelope>(body)
        .map(|env| env.error.message)
        .unwrap_or_else(|_| truncate_to_char_boundary(body, 500).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = AiClient::new("pplx-test").with_base_url("https://custom.api.com/");

        assert_eq!(client.api_key, "pplx-test");
        assert_eq!(client.base_url(), "https://custom.api.com");
    }

    #[test]
    fn test_default_base_url() {
        let client = AiClient::new("k");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_with_timeout_builds() {
        let client = AiClient::new("k").with_timeout(Duration::from_secs(90));
        assert!(client.is_ok());
    }

    #[test]
    fn test_provider_message_prefers_error_payload() {
        let body = r#"{"error":{"message":"Invalid model 'x'","type":"invalid_request"}}"#;
        assert_eq!(provider_message(body), "Invalid model 'x'");
        assert_eq!(provider_message("Bad Gateway"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = AiClient::new("k")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2))
            .unwrap();

        let err = client
            .chat_completion(ChatRequest::new("m").message(Message::user("hi")))
            .await
            .unwrap_err();

        assert!(err.is_transport(), "unexpected error: {err:?}");
    }
}
