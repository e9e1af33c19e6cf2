use crate::ai::{ChatPrompt, Upstream};
use crate::proxy::ProxyHandler;
use crate::{prompts, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Turns a free-text idea into a 3D model description.
pub struct ThreeDDescription;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionRequest {
    pub prompt: String,
    /// Echoed back untouched, whatever JSON type the caller sent.
    #[serde(default)]
    pub project_id: Value,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionResponse {
    pub content: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub project_id: Value,
}

impl ProxyHandler for ThreeDDescription {
    type Request = DescriptionRequest;
    type Response = DescriptionResponse;

    const NAME: &'static str = "3d-description";
    const UPSTREAM: Upstream = Upstream::GenerativeContent;

    fn build_prompt(request: &Self::Request) -> Result<ChatPrompt> {
        let idea = request.prompt.trim();
        if idea.is_empty() {
            return Err(Error::MalformedInput("prompt must not be blank".to_string()));
        }

        Ok(ChatPrompt::new(
            prompts::DESCRIPTION_SYSTEM.trim(),
            prompts::render(prompts::DESCRIPTION_USER, &[("prompt", idea)]),
        ))
    }

    fn transform(request: Self::Request, generated: String) -> Result<Self::Response> {
        Ok(DescriptionResponse {
            content: generated,
            success: true,
            project_id: request.project_id,
        })
    }
}
