use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::ai::{ChatPrompt, ChatService, Role};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// [`ChatService`] backed by Gemini `generateContent`.
pub struct GeminiChatClient {
    http: GeminiHttpClient,
}

impl GeminiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(60),
                client,
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    /// Text of the first candidate's first part.
    fn extract_text(response: GenerateContentResponse) -> Option<String> {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
    }
}

#[async_trait]
impl ChatService for GeminiChatClient {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String> {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::text(None, prompt.system.clone())),
            contents: vec![Content::text(
                Some(Role::User.as_str()),
                prompt.user.clone(),
            )],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(2048),
            }),
        };

        tracing::debug!("Sending generateContent request to {}", self.http.model());
        let response = self.http.generate_content(&request).await?;

        Self::extract_text(response)
            .ok_or_else(|| Error::AiProvider("No text in Gemini response".to_string()))
    }
}
