//! LLM error types

use thiserror::Error;

/// LLM error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
    /// The provider's own wording (HTTP code, message, status name), without
    /// our prefix. Same as `message` for errors raised locally.
    pub detail: String,
}

impl LlmError {
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind,
            detail: message.clone(),
            message,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Network, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::RateLimit, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::ServerError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Auth, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::InvalidRequest, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Unknown, message)
    }
}

/// Error classification by HTTP outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// Network issues, timeouts
    Network,
    /// Rate limited or out of quota (429)
    RateLimit,
    /// Server error (5xx)
    ServerError,
    /// Authentication failed (401, 403)
    Auth,
    /// Bad request (400), which is also how Gemini reports a bad key
    InvalidRequest,
    /// Unknown error
    Unknown,
}

impl LlmErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::RateLimit => "rate_limit",
            Self::ServerError => "server_error",
            Self::Auth => "auth",
            Self::InvalidRequest => "invalid_request",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = LlmError::rate_limit("Rate limit exceeded: quota exhausted");
        assert_eq!(err.to_string(), "Rate limit exceeded: quota exhausted");
        assert_eq!(err.kind, LlmErrorKind::RateLimit);
    }

    #[test]
    fn detail_defaults_to_message() {
        let err = LlmError::network("Connection failed: refused");
        assert_eq!(err.detail, err.message);

        let err = LlmError::invalid_request("Invalid request: no")
            .with_detail("400 no (FAILED_PRECONDITION)");
        assert_eq!(err.to_string(), "Invalid request: no");
        assert_eq!(err.detail, "400 no (FAILED_PRECONDITION)");
    }

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(LlmErrorKind::InvalidRequest.as_str(), "invalid_request");
        assert_eq!(LlmErrorKind::ServerError.as_str(), "server_error");
    }
}
