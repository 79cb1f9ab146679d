//! Stateful chat handle
//!
//! The remote endpoint is stateless, so the handle keeps every successful
//! turn and replays it with each request. Sampling is fixed at creation.

use super::{GenerationConfig, LlmError, LlmMessage, LlmRequest, LlmService};
use std::sync::Arc;

pub struct ChatSession {
    service: Arc<dyn LlmService>,
    generation: GenerationConfig,
    history: Vec<LlmMessage>,
}

impl ChatSession {
    /// Open a chat with an empty history
    pub fn start(service: Arc<dyn LlmService>, generation: GenerationConfig) -> Self {
        Self {
            service,
            generation,
            history: Vec::new(),
        }
    }

    pub fn generation(&self) -> GenerationConfig {
        self.generation
    }

    #[cfg(test)]
    pub fn history(&self) -> &[LlmMessage] {
        &self.history
    }

    /// Send one user turn. Only successful exchanges join the history.
    pub async fn send(&mut self, text: &str) -> Result<String, LlmError> {
        let mut messages = self.history.clone();
        messages.push(LlmMessage::user(text));

        let request = LlmRequest {
            messages,
            generation: self.generation,
        };
        let response = self.service.complete(&request).await?;

        self.history.push(LlmMessage::user(text));
        self.history.push(LlmMessage::assistant(response.text.clone()));
        Ok(response.text)
    }
}
