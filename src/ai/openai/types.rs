//! OpenAI-specific request/response payloads used by provider modules.

use crate::ai::ChatMessage;
use serde::{Deserialize, Serialize};

/// Request body for OpenAI chat completions.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Message object as returned inside a choice.
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub role: Option<String>,
    pub content: Option<String>,
}

/// Top-level chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// Single choice item returned by chat completions.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}
