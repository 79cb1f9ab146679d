//! Per-tab chat sessions
//!
//! A session owns the transcript shown in the page and, once the first
//! message goes out, the chat handle used to talk to the model. Clearing
//! drops both so the next turn opens a fresh handle with the sampling
//! current at that moment.

mod hint;
mod registry;
mod sampling;
mod transcript;

#[cfg(test)]
mod proptests;

pub use hint::ErrorHint;
pub use registry::{SessionGuard, SessionHandle, SessionId, SessionRegistry};
pub use sampling::*;
pub use transcript::{Transcript, TranscriptEntry};

use crate::llm::{ChatSession, LlmError, LlmService};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Invalid sampling: {0}")]
    InvalidSampling(String),
}

/// A failed send, as displayed to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnFailure {
    pub message: String,
    pub hint: Option<ErrorHint>,
}

impl TurnFailure {
    /// The hint reads the provider's wording, not our prefixed message
    pub fn from_error(error: &LlmError) -> Self {
        Self {
            message: error.to_string(),
            hint: ErrorHint::classify(&error.detail),
        }
    }

    /// Text stored in the transcript in place of a reply
    pub fn display(&self) -> String {
        format!("❌ Error: {}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Reply(String),
    Failed(TurnFailure),
}

/// Everything needed to redraw the page
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub entries: Vec<TranscriptEntry>,
    pub sent_count: usize,
    /// Sampling of the open chat handle, if any
    pub sampling: Option<SamplingConfig>,
    pub awaiting_reply: bool,
}

pub struct Session {
    service: Arc<dyn LlmService>,
    transcript: Transcript,
    chat: Option<ChatSession>,
}

impl Session {
    pub fn new(service: Arc<dyn LlmService>) -> Self {
        Self {
            service,
            transcript: Transcript::default(),
            chat: None,
        }
    }

    #[cfg(test)]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Sampling the current chat handle was opened with
    pub fn sampling(&self) -> Option<SamplingConfig> {
        self.chat.as_ref().map(|chat| chat.generation().into())
    }

    pub fn has_chat(&self) -> bool {
        self.chat.is_some()
    }

    pub fn snapshot(&self, awaiting_reply: bool) -> SessionSnapshot {
        SessionSnapshot {
            entries: self.transcript.entries().to_vec(),
            sent_count: self.transcript.sent_count(),
            sampling: self.sampling(),
            awaiting_reply,
        }
    }

    /// Empty the transcript and drop the chat handle
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.chat = None;
    }

    /// Record the user's message. Returns the trimmed text to send.
    pub fn begin_turn(&mut self, text: &str) -> Result<String, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        self.transcript.push_user(text);
        Ok(text.to_string())
    }

    /// Send the text recorded by `begin_turn` and record the result.
    ///
    /// `sampling` only matters when no chat handle is open yet.
    pub async fn finish_turn(&mut self, text: &str, sampling: SamplingConfig) -> TurnOutcome {
        let service = &self.service;
        let chat = self
            .chat
            .get_or_insert_with(|| ChatSession::start(service.clone(), sampling.into()));

        match chat.send(text).await {
            Ok(reply) => {
                self.transcript.push_assistant(reply.clone());
                TurnOutcome::Reply(reply)
            }
            Err(e) => {
                let failure = TurnFailure::from_error(&e);
                self.transcript.push_failure(failure.display());
                TurnOutcome::Failed(failure)
            }
        }
    }

    /// One complete turn
    #[cfg(test)]
    pub async fn submit(
        &mut self,
        text: &str,
        sampling: SamplingConfig,
    ) -> Result<TurnOutcome, SessionError> {
        let text = self.begin_turn(text)?;
        Ok(self.finish_turn(&text, sampling).await)
    }
}
