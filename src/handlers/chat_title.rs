use crate::ai::{ChatPrompt, Upstream};
use crate::proxy::ProxyHandler;
use crate::{prompts, Error, Result};
use serde::{Deserialize, Serialize};

/// Generates a short title for a chat transcript.
pub struct ChatTitle;

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatTitleRequest {
    pub messages: Vec<TranscriptMessage>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ChatTitleResponse {
    pub title: String,
}

impl ProxyHandler for ChatTitle {
    type Request = ChatTitleRequest;
    type Response = ChatTitleResponse;

    const NAME: &'static str = "chat-title";
    const UPSTREAM: Upstream = Upstream::ChatCompletion;

    fn build_prompt(request: &Self::Request) -> Result<ChatPrompt> {
        if request.messages.is_empty() {
            return Err(Error::MalformedInput(
                "messages must contain at least one entry".to_string(),
            ));
        }

        let transcript = request
            .messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ChatPrompt::new(
            prompts::CHAT_TITLE_SYSTEM.trim(),
            prompts::render(prompts::CHAT_TITLE_USER, &[("transcript", &transcript)]),
        ))
    }

    fn transform(_request: Self::Request, generated: String) -> Result<Self::Response> {
        Ok(ChatTitleResponse {
            title: generated.trim().to_string(),
        })
    }
}
