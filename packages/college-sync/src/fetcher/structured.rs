use ai_client::{strip_code_blocks, AiClient, ChatRequest, Message, StructuredOutput};
use async_trait::async_trait;
use tracing::debug;

use super::prompts::{user_prompt, STRUCTURED_USER_PROMPT, SYSTEM_PROMPT};
use super::{attach_citation, parse_records, BatchFetcher, FetcherSettings};
use crate::domain::DomainConfig;
use crate::error::FetchResult;
use crate::record::{CollegeRecord, UpstreamCollege};
use crate::window::RankWindow;

/// Fetcher that constrains the reply with a JSON schema.
#[derive(Clone)]
pub struct StructuredFetcher {
    client: AiClient,
    settings: FetcherSettings,
    schema: serde_json::Value,
}

impl StructuredFetcher {
    pub fn new(client: AiClient, settings: FetcherSettings) -> Self {
        Self {
            client,
            settings,
            schema: Vec::<UpstreamCollege>::response_schema(),
        }
    }

    pub fn build_request(&self, domain: &DomainConfig, window: RankWindow) -> ChatRequest {
        ChatRequest::new(&self.settings.model)
            .message(Message::system(SYSTEM_PROMPT))
            .message(Message::user(user_prompt(STRUCTURED_USER_PROMPT, domain, window)))
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
            .json_schema("colleges", self.schema.clone())
    }
}

#[async_trait]
impl BatchFetcher for StructuredFetcher {
    async fn fetch_batch(
        &self,
        domain: &DomainConfig,
        window: RankWindow,
    ) -> FetchResult<Vec<CollegeRecord>> {
        let request = self.build_request(domain, window);
        let response = self.client.chat_completion(request).await?;

        let mut records = parse_records(strip_code_blocks(&response.content))?;
        attach_citation(&mut records, &response.citations);

        debug!(
            domain = domain.key,
            window = %window,
            parsed = records.len(),
            tokens = response.total_tokens(),
            "Structured batch parsed"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    fn fetcher() -> StructuredFetcher {
        StructuredFetcher::new(AiClient::new("test-key"), FetcherSettings::new("sonar-pro"))
    }

    #[test]
    fn test_request_carries_array_schema_with_mandatory_fields() {
        let request = fetcher().build_request(
            Domain::Engineering.config(),
            RankWindow::new(1, 10).unwrap(),
        );
        let body = serde_json::to_value(&request).unwrap();
        let schema = &body["response_format"]["json_schema"]["schema"];

        assert_eq!(schema["type"], "array");
        let required: Vec<&str> = schema["items"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        for field in ["name", "location", "type", "entranceExamRequired"] {
            assert!(required.contains(&field), "{field} should be required");
        }
        assert!(!required.contains(&"website"));
    }

    #[test]
    fn test_request_uses_low_temperature_and_two_messages() {
        let request = fetcher().build_request(
            Domain::Law.config(),
            RankWindow::new(21, 25).unwrap(),
        );

        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[1].content.contains("ranked 21 to 25"));
    }
}
