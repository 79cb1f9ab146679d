//! API request and response types

use crate::llm::MessageRole;
use crate::markdown;
use crate::session::{
    ErrorHint, SamplingConfig, SessionId, SessionSnapshot, TranscriptEntry, TurnOutcome,
    DEFAULT_MAX_OUTPUT_LENGTH, DEFAULT_TEMPERATURE, MAX_OUTPUT_LENGTH_RANGE,
    MAX_OUTPUT_LENGTH_STEP, TEMPERATURE_RANGE, TEMPERATURE_STEP,
};
use serde::{Deserialize, Serialize};

/// Request to send a chat message with the sidebar values
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    pub temperature: Option<f32>,
    pub max_output_length: Option<u32>,
}

/// One transcript entry, ready to draw
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub role: MessageRole,
    pub content: String,
    pub content_html: String,
    pub failed: bool,
}

impl From<&TranscriptEntry> for MessageView {
    fn from(entry: &TranscriptEntry) -> Self {
        Self {
            role: entry.role,
            content: entry.content.clone(),
            content_html: markdown::render(&entry.content),
            failed: entry.failed,
        }
    }
}

/// Full redraw of a session
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub messages: Vec<MessageView>,
    pub sent_count: usize,
    pub sampling: Option<SamplingConfig>,
    pub awaiting_reply: bool,
}

impl From<&SessionSnapshot> for SnapshotResponse {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            messages: snapshot.entries.iter().map(MessageView::from).collect(),
            sent_count: snapshot.sent_count,
            sampling: snapshot.sampling,
            awaiting_reply: snapshot.awaiting_reply,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HintView {
    pub kind: ErrorHint,
    pub text: &'static str,
}

/// Result of one submitted message
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<HintView>,
    pub snapshot: SnapshotResponse,
}

impl TurnResponse {
    pub fn new(outcome: TurnOutcome, snapshot: &SessionSnapshot) -> Self {
        let snapshot = SnapshotResponse::from(snapshot);
        match outcome {
            TurnOutcome::Reply(reply) => Self {
                reply: Some(reply),
                error: None,
                hint: None,
                snapshot,
            },
            TurnOutcome::Failed(failure) => Self {
                reply: None,
                error: Some(failure.display()),
                hint: failure.hint.map(|kind| HintView {
                    kind,
                    text: kind.text(),
                }),
                snapshot,
            },
        }
    }
}

/// Bounds and defaults for the sidebar controls
#[derive(Debug, Serialize)]
pub struct SamplingLimits {
    pub temperature_min: f32,
    pub temperature_max: f32,
    pub temperature_step: f32,
    pub temperature_default: f32,
    pub max_output_length_min: u32,
    pub max_output_length_max: u32,
    pub max_output_length_step: u32,
    pub max_output_length_default: u32,
}

impl Default for SamplingLimits {
    fn default() -> Self {
        Self {
            temperature_min: *TEMPERATURE_RANGE.start(),
            temperature_max: *TEMPERATURE_RANGE.end(),
            temperature_step: TEMPERATURE_STEP,
            temperature_default: DEFAULT_TEMPERATURE,
            max_output_length_min: *MAX_OUTPUT_LENGTH_RANGE.start(),
            max_output_length_max: *MAX_OUTPUT_LENGTH_RANGE.end(),
            max_output_length_step: MAX_OUTPUT_LENGTH_STEP,
            max_output_length_default: DEFAULT_MAX_OUTPUT_LENGTH,
        }
    }
}

/// First event on a session stream
#[derive(Debug, Serialize)]
pub struct InitPayload {
    pub session_id: SessionId,
    pub model: String,
    pub limits: SamplingLimits,
    pub snapshot: SnapshotResponse,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
