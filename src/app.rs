//! Service wiring shared by the HTTP handlers and the CLI.

use crate::ai::{ChatService, GeminiChatClient, OpenAiChatClient, Upstream};
use crate::image::{ImageClient, ImageService};
use crate::models::Config;
use crate::{Error, Result};
use tracing::{info, warn};

/// Upstream clients for one running gateway.
///
/// A text upstream is `None` when its API key was not configured; handlers
/// that need it fail with a configuration error before any network call.
pub struct App {
    chat: Option<Box<dyn ChatService>>,
    content: Option<Box<dyn ChatService>>,
    image: Box<dyn ImageService>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub chat: Option<Box<dyn ChatService>>,
    pub content: Option<Box<dyn ChatService>>,
    pub image: Box<dyn ImageService>,
}

impl App {
    pub fn with_services(services: AppServices) -> Self {
        Self {
            chat: services.chat,
            content: services.content,
            image: services.image,
        }
    }

    /// Build the real provider clients from configuration.
    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        let chat: Option<Box<dyn ChatService>> = match &config.openai_api_key {
            Some(api_key) => {
                info!("Chat completion provider: OpenAI (model: {})", config.openai_model);
                Some(Box::new(
                    OpenAiChatClient::new_with_client(
                        api_key.clone(),
                        config.openai_model.clone(),
                        http_client.clone(),
                    )
                    .with_base_url(config.openai_base_url.clone()),
                ))
            }
            None => {
                warn!(
                    "{} not set; chat completion handlers will fail",
                    Upstream::ChatCompletion.credential()
                );
                None
            }
        };

        let content: Option<Box<dyn ChatService>> = match &config.gemini_api_key {
            Some(api_key) => {
                info!("Generative content provider: Gemini (model: {})", config.gemini_model);
                Some(Box::new(
                    GeminiChatClient::new_with_client(
                        api_key.clone(),
                        config.gemini_model.clone(),
                        http_client.clone(),
                    )
                    .with_base_url(config.gemini_base_url.clone()),
                ))
            }
            None => {
                warn!(
                    "{} not set; generative content handlers will fail",
                    Upstream::GenerativeContent.credential()
                );
                None
            }
        };

        let image = Box::new(ImageClient::new_with_client(
            config.image_base_url.clone(),
            http_client,
        ));

        Self::with_services(AppServices {
            chat,
            content,
            image,
        })
    }

    /// The text service for `upstream`, or a configuration error naming the
    /// missing secret.
    pub fn service(&self, upstream: Upstream) -> Result<&dyn ChatService> {
        let service = match upstream {
            Upstream::ChatCompletion => self.chat.as_deref(),
            Upstream::GenerativeContent => self.content.as_deref(),
        };
        service.ok_or_else(|| {
            Error::Config(format!("{} is not configured", upstream.credential()))
        })
    }

    pub fn image(&self) -> &dyn ImageService {
        self.image.as_ref()
    }
}
