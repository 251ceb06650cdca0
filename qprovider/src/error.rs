//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use qprovider::ProviderError;
//!
//! let auth = ProviderError::authentication("bad key");
//! assert_eq!(auth.to_string(), "Authentication: bad key");
//!
//! let event = ProviderError::stream_event(Some("server_error"), "boom");
//! assert_eq!(event.message, "server_error: boom");
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Authentication,
    RateLimited,
    InvalidRequest,
    Timeout,
    Transport,
    Unavailable,
    Stream,
    Other,
}

/// Failure raised by a transport or while consuming its event stream.
///
/// `message` carries the raw transport text; classification into localized
/// categories happens in the chat layer and always works on this field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }

    /// Builds the failure for an error event received mid-stream.
    ///
    /// The code prefixes the message only when present.
    pub fn stream_event(code: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = match code {
            Some(code) if !code.is_empty() => format!("{code}: {message}"),
            _ => message,
        };

        Self::new(ProviderErrorKind::Stream, message)
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}
