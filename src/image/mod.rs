//! Image generation through a public prompt-to-image GET endpoint
//!
//! Builds the request URL from a prompt and size options, fetches the
//! generated image, and saves it to disk.

pub mod client;
pub mod download;
pub mod mime;
pub mod mock;

pub use client::ImageClient;
pub use download::{download_image, save_image, DEFAULT_DOWNLOAD_FILENAME};
pub use mock::MockImageClient;

use crate::{Error, Result};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.pollinations.ai";

/// Everything except the characters `encodeURIComponent` leaves alone.
const PROMPT_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    pub width: u32,
    pub height: u32,
    pub seed: Option<u64>,
    pub nologo: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            seed: None,
            nologo: true,
        }
    }
}

/// A fetched image together with the URL it was generated from.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub url: String,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// Build `{base}/prompt/{prompt}?width=..&height=..[&nologo=true][&seed=..]`
/// with the prompt percent-encoded as a single path segment.
///
/// The result is assembled as text: re-parsing it as a `Url` would collapse
/// `.` and `..` prompts.
pub fn build_url(base_url: &str, prompt: &str, options: &ImageOptions) -> Result<String> {
    let mut base = Url::parse(base_url)
        .map_err(|e| Error::ImageService(format!("Invalid image base URL '{}': {}", base_url, e)))?;

    if base.cannot_be_a_base() {
        return Err(Error::ImageService(format!(
            "Image base URL '{}' cannot have a path",
            base_url
        )));
    }
    base.set_query(None);
    base.set_fragment(None);

    let mut url = format!(
        "{}/prompt/{}?width={}&height={}",
        base.as_str().trim_end_matches('/'),
        utf8_percent_encode(prompt, PROMPT_SEGMENT),
        options.width,
        options.height
    );
    if options.nologo {
        url.push_str("&nologo=true");
    }
    if let Some(seed) = options.seed {
        url.push_str(&format!("&seed={}", seed));
    }

    Ok(url)
}

/// [`build_url`] against the default public endpoint.
pub fn build_image_url(prompt: &str, options: &ImageOptions) -> String {
    build_url(DEFAULT_IMAGE_BASE_URL, prompt, options)
        .expect("default image base URL is a valid base")
}

#[async_trait]
pub trait ImageService: Send + Sync {
    fn build_url(&self, prompt: &str, options: &ImageOptions) -> Result<String>;

    /// GET `url` and return the body bytes.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    async fn generate(&self, prompt: &str, options: &ImageOptions) -> Result<GeneratedImage> {
        let url = self.build_url(prompt, options)?;
        let bytes = self.fetch(&url).await?;
        Ok(GeneratedImage {
            mime: mime::sniff_mime(&bytes),
            url,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_in_url() {
        let url = build_image_url("a red fox", &ImageOptions::default());

        assert!(url.starts_with("https://image.pollinations.ai/prompt/a%20red%20fox?"));
        assert!(url.contains("width=512&height=512&nologo=true"));
        assert!(!url.contains("seed="));
    }

    #[test]
    fn test_seed_is_appended() {
        let options = ImageOptions {
            seed: Some(7),
            ..ImageOptions::default()
        };

        let url = build_image_url("fox", &options);
        assert!(url.ends_with("width=512&height=512&nologo=true&seed=7"));
    }

    #[test]
    fn test_prompt_reserved_characters_are_encoded() {
        let url = build_image_url("cats/dogs?#1", &ImageOptions::default());

        assert!(url.contains("/prompt/cats%2Fdogs%3F%231?"));
    }

    #[test]
    fn test_prompt_query_delimiters_are_encoded() {
        let url = build_image_url("a+b&c=d;e:f@g,h$", &ImageOptions::default());

        assert!(url.contains("/prompt/a%2Bb%26c%3Dd%3Be%3Af%40g%2Ch%24?"));
    }

    #[test]
    fn test_dot_segment_prompts_are_kept() {
        let url = build_image_url("..", &ImageOptions::default());
        assert!(url.starts_with("https://image.pollinations.ai/prompt/..?"));

        let url = build_image_url(".", &ImageOptions::default());
        assert!(url.starts_with("https://image.pollinations.ai/prompt/.?"));
    }

    #[test]
    fn test_percent_and_unreserved_marks() {
        let url = build_image_url("100% (cool)!~*'_-.", &ImageOptions::default());
        assert!(url.contains("/prompt/100%25%20(cool)!~*'_-.?"));
    }

    #[test]
    fn test_non_ascii_prompt_is_utf8_encoded() {
        let url = build_image_url("café", &ImageOptions::default());
        assert!(url.contains("/prompt/caf%C3%A9?"));
    }

    #[test]
    fn test_nologo_false_is_omitted() {
        let options = ImageOptions {
            width: 1024,
            height: 768,
            nologo: false,
            ..ImageOptions::default()
        };

        let url = build_image_url("fox", &options);
        assert!(url.ends_with("?width=1024&height=768"));
    }

    #[test]
    fn test_custom_base_with_trailing_slash() {
        let url = build_url("http://localhost:9999/", "fox", &ImageOptions::default()).unwrap();
        assert!(url.starts_with("http://localhost:9999/prompt/fox?"));
    }

    #[test]
    fn test_custom_base_with_path_prefix() {
        let url = build_url("http://localhost:9999/images?x=1", "fox", &ImageOptions::default())
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:9999/images/prompt/fox?width=512&height=512&nologo=true"
        );
    }

    #[test]
    fn test_invalid_base_is_rejected() {
        let err = build_url("not a url", "fox", &ImageOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ImageService(_)));
    }
}
