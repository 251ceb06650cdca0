//! Redacted in-memory credential value.
//!
//! ```rust
//! use qprovider::{SecretString, looks_like_api_key};
//!
//! let key = SecretString::new("sk-test-0123456789abcdef");
//! assert_eq!(format!("{key:?}"), "[REDACTED]");
//! assert!(looks_like_api_key(key.expose()));
//! ```

use std::fmt::Formatter;

const API_KEY_PREFIX: &str = "sk-";
const API_KEY_MIN_LEN: usize = 20;

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// True when the secret is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8, so the string stays well formed.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Heuristic for text that looks like an API key (`sk-` prefix, at least 20 chars).
///
/// UI glue uses this to avoid pasting a key into a prompt.
pub fn looks_like_api_key(text: &str) -> bool {
    let text = text.trim();
    text.starts_with(API_KEY_PREFIX) && text.len() >= API_KEY_MIN_LEN
}
