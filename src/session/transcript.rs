//! Ordered chat transcript

use crate::llm::MessageRole;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: MessageRole,
    pub content: String,
    /// Set on the assistant entry standing in for a failed turn
    pub failed: bool,
}

/// Append-only list of entries, cleared wholesale
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(MessageRole::User, content.into(), false);
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(MessageRole::Assistant, content.into(), false);
    }

    pub fn push_failure(&mut self, content: impl Into<String>) {
        self.push(MessageRole::Assistant, content.into(), true);
    }

    fn push(&mut self, role: MessageRole, content: String, failed: bool) {
        self.entries.push(TranscriptEntry {
            role,
            content,
            failed,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of exchanges, as shown by the sidebar counter
    pub fn sent_count(&self) -> usize {
        self.entries.len() / 2
    }
}
