//! AI service integration for text generation
//!
//! Provides the provider-neutral prompt types and the [`ChatService`] seam,
//! with implementations for the OpenAI chat-completion API and the Gemini
//! `generateContent` API.

pub mod gemini;
pub mod mock;
pub mod openai;

pub use gemini::GeminiChatClient;
pub use mock::MockChatClient;
pub use openai::OpenAiChatClient;

use crate::models::{GEMINI_API_KEY_VAR, OPENAI_API_KEY_VAR};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// A fixed system instruction plus the user content it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

impl ChatPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Upstream message sequence; the system message is always first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: Role::System,
                content: self.system.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: self.user.clone(),
            },
        ]
    }
}

/// Which upstream text provider a handler talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// OpenAI-style `/v1/chat/completions`.
    ChatCompletion,
    /// Gemini-style `:generateContent`.
    GenerativeContent,
}

impl Upstream {
    /// Name of the secret that must be configured for this upstream.
    pub fn credential(self) -> &'static str {
        match self {
            Upstream::ChatCompletion => OPENAI_API_KEY_VAR,
            Upstream::GenerativeContent => GEMINI_API_KEY_VAR,
        }
    }
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send one prompt upstream and return the generated text from the envelope.
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String>;
}

/// Decode a provider envelope, or fail with the status and body text when
/// the provider answered with a non-success status.
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    provider: &str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!("{} API error (status {}): {}", provider, status, body);
        return Err(Error::AiProvider(format!(
            "{} API error (status {}): {}",
            provider, status, body
        )));
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!("Failed to parse {} response: {}\nBody: {}", provider, e, body);
        Error::AiProvider(format!("Failed to parse {} response: {}", provider, e))
    })
}
