use ai_client::{extract_json_array, AiClient, ChatRequest, Message};
use async_trait::async_trait;
use tracing::debug;

use super::prompts::{user_prompt, LEGACY_USER_PROMPT, SYSTEM_PROMPT};
use super::{attach_citation, parse_records, BatchFetcher, FetcherSettings};
use crate::domain::DomainConfig;
use crate::error::{FetchError, FetchResult};
use crate::record::CollegeRecord;
use crate::window::RankWindow;

/// Fetcher without a response schema. The array is cut out of free text.
#[derive(Clone)]
pub struct LegacyFetcher {
    client: AiClient,
    settings: FetcherSettings,
}

impl LegacyFetcher {
    pub fn new(client: AiClient, settings: FetcherSettings) -> Self {
        Self { client, settings }
    }

    pub fn build_request(&self, domain: &DomainConfig, window: RankWindow) -> ChatRequest {
        ChatRequest::new(&self.settings.model)
            .message(Message::system(SYSTEM_PROMPT))
            .message(Message::user(user_prompt(LEGACY_USER_PROMPT, domain, window)))
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
    }
}

/// Parse records out of free-form model output.
pub fn parse_free_text(content: &str) -> FetchResult<Vec<CollegeRecord>> {
    let span = extract_json_array(content).ok_or_else(|| {
        FetchError::MalformedResponse("no JSON array found in response".to_string())
    })?;
    parse_records(span)
}

#[async_trait]
impl BatchFetcher for LegacyFetcher {
    async fn fetch_batch(
        &self,
        domain: &DomainConfig,
        window: RankWindow,
    ) -> FetchResult<Vec<CollegeRecord>> {
        let request = self.build_request(domain, window);
        let response = self.client.chat_completion(request).await?;

        let mut records = parse_free_text(&response.content)?;
        attach_citation(&mut records, &response.citations);

        debug!(
            domain = domain.key,
            window = %window,
            parsed = records.len(),
            tokens = response.total_tokens(),
            "Legacy batch parsed"
        );
        Ok(records)
    }
}
