//! Shared request pipeline for the AI-proxy handlers.
//!
//! Every handler follows the same sequence: parse the inbound body into a
//! typed request, check that its upstream is configured, render a prompt,
//! make exactly one upstream call, and reshape the generated text. Handlers
//! only supply the pieces that differ through [`ProxyHandler`].

use crate::ai::{ChatPrompt, Upstream};
use crate::app::App;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

pub trait ProxyHandler: Send + Sync + 'static {
    type Request: DeserializeOwned + Send;
    type Response: Serialize + Send;

    /// Short name used in logs.
    const NAME: &'static str;
    const UPSTREAM: Upstream;

    /// Validate the request and assemble the upstream prompt.
    fn build_prompt(request: &Self::Request) -> Result<ChatPrompt>;

    /// Reshape the generated text into the handler's response payload.
    fn transform(request: Self::Request, generated: String) -> Result<Self::Response>;
}

pub fn parse_request<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| Error::MalformedInput(format!("Invalid request body: {}", e)))
}

/// Run one request through handler `H`.
pub async fn execute<H: ProxyHandler>(app: &App, body: &[u8]) -> Result<H::Response> {
    let request_id = Uuid::new_v4();
    info!("[{}] Request {} received ({} bytes)", H::NAME, request_id, body.len());

    let request: H::Request = parse_request(body)?;
    let service = app.service(H::UPSTREAM)?;
    let prompt = H::build_prompt(&request)?;

    let generated = service.complete(&prompt).await?;
    info!(
        "[{}] Request {} generated {} chars",
        H::NAME,
        request_id,
        generated.len()
    );

    H::transform(request, generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockChatClient;
    use crate::app::AppServices;
    use crate::image::MockImageClient;
    use serde::Deserialize;

    struct Echo;

    #[derive(Deserialize)]
    struct EchoRequest {
        text: String,
    }

    #[derive(Debug, Serialize)]
    struct EchoResponse {
        reply: String,
    }

    impl ProxyHandler for Echo {
        type Request = EchoRequest;
        type Response = EchoResponse;

        const NAME: &'static str = "echo";
        const UPSTREAM: Upstream = Upstream::ChatCompletion;

        fn build_prompt(request: &Self::Request) -> Result<ChatPrompt> {
            if request.text.is_empty() {
                return Err(Error::MalformedInput("text must not be empty".to_string()));
            }
            Ok(ChatPrompt::new("echo", request.text.clone()))
        }

        fn transform(_request: Self::Request, generated: String) -> Result<Self::Response> {
            Ok(EchoResponse {
                reply: generated.to_uppercase(),
            })
        }
    }

    fn app_with_chat(chat: Option<MockChatClient>) -> App {
        App::with_services(AppServices {
            chat: chat.map(|c| Box::new(c) as Box<dyn crate::ai::ChatService>),
            content: None,
            image: Box::new(MockImageClient::new()),
        })
    }

    #[tokio::test]
    async fn test_execute_runs_prompt_and_transform() {
        let chat = MockChatClient::new().with_response("hello back");
        let recorder = chat.clone();
        let app = app_with_chat(Some(chat));

        let response = execute::<Echo>(&app, br#"{"text":"hello"}"#).await.unwrap();

        assert_eq!(response.reply, "HELLO BACK");
        assert_eq!(recorder.get_call_count(), 1);
        assert_eq!(recorder.get_prompts()[0].user, "hello");
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_json_before_upstream() {
        let chat = MockChatClient::new();
        let recorder = chat.clone();
        let app = app_with_chat(Some(chat));

        let err = execute::<Echo>(&app, b"not json").await.unwrap_err();

        assert!(matches!(err, Error::MalformedInput(_)));
        assert_eq!(recorder.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_execute_rejects_missing_fields() {
        let app = app_with_chat(Some(MockChatClient::new()));

        let err = execute::<Echo>(&app, b"{}").await.unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[tokio::test]
    async fn test_execute_requires_configured_upstream() {
        let app = app_with_chat(None);

        let err = execute::<Echo>(&app, br#"{"text":"hello"}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn test_execute_propagates_upstream_failure() {
        let app = app_with_chat(Some(MockChatClient::new().with_failure(true)));

        let err = execute::<Echo>(&app, br#"{"text":"hello"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
