//! Scripted model double for unit tests.

use async_trait::async_trait;
use providers::{ApiError, TextModel};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Pops one scripted reply per `generate` call and records every prompt it
/// was handed, so tests can assert both call order and prompt content.
pub(crate) struct MockModel {
    replies: Mutex<VecDeque<Result<String, ApiError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn with_replies(replies: Vec<Result<String, ApiError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::InvalidResponse(
                    "mock replies exhausted".to_string(),
                ))
            })
    }
}
