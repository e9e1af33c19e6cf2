use super::{build_url, ImageOptions, ImageService, DEFAULT_IMAGE_BASE_URL};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockImageClient {
    image_responses: Arc<Mutex<Vec<Vec<u8>>>>,
    fetched_urls: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
    base_url: String,
}

impl MockImageClient {
    pub fn new() -> Self {
        Self {
            image_responses: Arc::new(Mutex::new(Vec::new())),
            fetched_urls: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_image_response(self, response: Vec<u8>) -> Self {
        self.image_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_fetched_urls(&self) -> Vec<String> {
        self.fetched_urls.lock().unwrap().clone()
    }
}

impl Default for MockImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageService for MockImageClient {
    fn build_url(&self, prompt: &str, options: &ImageOptions) -> Result<String> {
        build_url(&self.base_url, prompt, options)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let count = {
            let mut urls = self.fetched_urls.lock().unwrap();
            urls.push(url.to_string());
            urls.len()
        };

        if *self.should_fail.lock().unwrap() {
            return Err(Error::ImageService(
                "Failed to generate image: 500 Internal Server Error".to_string(),
            ));
        }

        let responses = self.image_responses.lock().unwrap();
        if responses.is_empty() {
            // PNG signature only
            Ok(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
        } else {
            Ok(responses[(count - 1) % responses.len()].clone())
        }
    }
}
