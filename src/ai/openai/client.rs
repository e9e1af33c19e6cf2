use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::ai::read_envelope;
use crate::Result;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Bearer-authenticated client for the chat-completion endpoint.
pub struct OpenAiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiHttpClient {
    pub fn new_with_client(api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        tracing::debug!("POST {} (model: {})", url, request.model);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to OpenAI: {}", e);
                e
            })?;

        read_envelope("OpenAI", response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::openai::test_support;
    use crate::Error;
    use wiremock::{MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_slow_upstream_hits_request_timeout() {
        let server = MockServer::start().await;

        test_support::post(test_support::CHAT_COMPLETIONS_PATH)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "choices": [] }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = OpenAiHttpClient::new_with_client(
            "key".to_string(),
            Duration::from_millis(50),
            Client::new(),
        )
        .with_base_url(server.uri());
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: Vec::new(),
        };

        let err = client.chat_completion(&request).await.unwrap_err();
        match err {
            Error::Http(e) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
