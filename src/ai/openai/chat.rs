use super::client::OpenAiHttpClient;
use super::types::ChatCompletionRequest;
use crate::ai::{ChatPrompt, ChatService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// [`ChatService`] backed by OpenAI chat completions.
pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(60), client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ChatService for OpenAiChatClient {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: prompt.messages(),
        };

        let response = self.http.chat_completion(&request).await?;

        if let Some(reason) = response.choices.first().and_then(|c| c.finish_reason.as_deref()) {
            tracing::debug!("OpenAI finish_reason: {}", reason);
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))
    }
}
