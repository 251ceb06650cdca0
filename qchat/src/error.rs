//! Call-layer errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

use qprovider::ProviderError;

use crate::classify_error;

pub const EMPTY_INPUT_MESSAGE: &str = "入力テキストが空です";
pub const MISSING_API_KEY_MESSAGE: &str = "APIキーが設定されていません";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    /// Rejected locally before any network call.
    Validation,
    /// Creating the call or opening the stream failed.
    Negotiation,
    /// The stream reported an error or broke after it opened.
    Stream,
}

/// Failure of a single call. `message` is already user-facing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Validation, message)
    }

    pub fn empty_input() -> Self {
        Self::validation(EMPTY_INPUT_MESSAGE)
    }

    pub fn missing_api_key() -> Self {
        Self::validation(MISSING_API_KEY_MESSAGE)
    }

    pub fn negotiation(error: ProviderError) -> Self {
        Self::new(ChatErrorKind::Negotiation, classify_error(&error.message))
    }

    pub fn stream(error: ProviderError) -> Self {
        Self::new(ChatErrorKind::Stream, classify_error(&error.message))
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failures_are_classified_on_conversion() {
        let error = ChatError::negotiation(ProviderError::rate_limited("Rate_Limit_Exceeded"));
        assert_eq!(error.kind, ChatErrorKind::Negotiation);
        assert!(error.message.starts_with("レート制限"));

        let raw = ChatError::stream(ProviderError::stream_event(None, "socket closed"));
        assert_eq!(raw.message, "socket closed");
        assert_eq!(raw.to_string(), "Stream: socket closed");
    }
}
