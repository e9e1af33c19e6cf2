use super::{ChatPrompt, ChatService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockChatClient {
    responses: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<ChatPrompt>>>,
    call_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Prompts received so far, in call order.
    pub fn get_prompts(&self) -> Vec<ChatPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.prompts.lock().unwrap().push(prompt.clone());

        if *self.should_fail.lock().unwrap() {
            return Err(Error::AiProvider("Mock upstream failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(format!("Generated reply to: {}", prompt.user))
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
