use super::GenerationInvoker;
use crate::error::InvokeError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Replays queued responses in order and remembers the prompts it was given
pub struct MockInvoker {
    responses: Mutex<VecDeque<Result<String, InvokeError>>>,
    prompts: Mutex<Vec<String>>,
    name: String,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockInvoker {
    pub fn new() -> Self {
        Self::with_name("MockInvoker")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            name: name.into(),
        }
    }

    pub fn add_response(&self, output: impl Into<String>) {
        lock(&self.responses).push_back(Ok(output.into()));
    }

    pub fn add_error(&self, error: InvokeError) {
        lock(&self.responses).push_back(Err(error));
    }

    pub fn remaining_responses(&self) -> usize {
        lock(&self.responses).len()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

impl Default for MockInvoker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationInvoker for MockInvoker {
    async fn generate(&self, prompt: &str) -> Result<String, InvokeError> {
        lock(&self.prompts).push(prompt.to_string());
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| {
                Err(InvokeError::Other {
                    message: "MockInvoker: No more responses in queue".to_string(),
                })
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
