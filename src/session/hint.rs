//! Secondary hints shown under a failed turn

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorHint {
    /// The failure mentions a quota
    RateLimit,
    /// The failure mentions something invalid, usually the key
    InvalidCredentials,
}

impl ErrorHint {
    /// Match the failure text, quota first
    pub fn classify(message: &str) -> Option<Self> {
        let lower = message.to_lowercase();
        if lower.contains("quota") {
            Some(Self::RateLimit)
        } else if lower.contains("invalid") {
            Some(Self::InvalidCredentials)
        } else {
            None
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::RateLimit => "⚠️ API limit reached. Wait a moment.",
            Self::InvalidCredentials => "🔑 Invalid API key. Check your .env",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_hint() {
        assert_eq!(
            ErrorHint::classify("Rate limit exceeded: Quota exceeded for metric"),
            Some(ErrorHint::RateLimit)
        );
    }

    #[test]
    fn test_invalid_hint() {
        assert_eq!(
            ErrorHint::classify("400 API key not valid. (INVALID_ARGUMENT)"),
            Some(ErrorHint::InvalidCredentials)
        );
        assert_eq!(
            ErrorHint::classify("reason: API_KEY_INVALID"),
            Some(ErrorHint::InvalidCredentials)
        );
    }

    #[test]
    fn test_quota_wins_over_invalid() {
        assert_eq!(
            ErrorHint::classify("invalid quota project"),
            Some(ErrorHint::RateLimit)
        );
    }

    #[test]
    fn test_no_hint() {
        assert_eq!(ErrorHint::classify("Connection failed: refused"), None);
        assert_eq!(
            ErrorHint::classify(
                "400 User location is not supported for the API use. (FAILED_PRECONDITION)"
            ),
            None
        );
        assert_eq!(ErrorHint::classify(""), None);
    }
}
