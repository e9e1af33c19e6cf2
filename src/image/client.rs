use super::{build_url, ImageOptions, ImageService, DEFAULT_IMAGE_BASE_URL};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HTTP client for the prompt-to-image endpoint.
pub struct ImageClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ImageClient {
    pub fn new() -> Self {
        Self::new_with_client(DEFAULT_IMAGE_BASE_URL.to_string(), Client::new())
    }

    pub fn new_with_client(base_url: String, client: Client) -> Self {
        Self {
            client,
            base_url,
            timeout: Duration::from_secs(120),
        }
    }
}

impl Default for ImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageService for ImageClient {
    fn build_url(&self, prompt: &str, options: &ImageOptions) -> Result<String> {
        build_url(&self.base_url, prompt, options)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Fetching image from {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send image request: {}", e);
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown status");
            tracing::error!("Image service error (status {})", status);
            return Err(Error::ImageService(format!(
                "Failed to generate image: {} {}",
                status.as_u16(),
                status_text
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
