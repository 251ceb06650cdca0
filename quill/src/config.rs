//! Persisted client settings.
//!
//! ```rust
//! use quill::ClientConfig;
//!
//! let config = ClientConfig::from_json_str(r#"{ "model": "gpt-4o" }"#).expect("valid config");
//! assert_eq!(config.model, "gpt-4o");
//! assert_eq!(config.max_output_tokens, 1024);
//! assert!(config.streaming);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

use qchat::CallRequest;
use qcommon::{DEFAULT_MAX_OUTPUT_TOKENS, non_blank};
use qprovider::{DEFAULT_BASE_URL, SecretString};
use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "ユーザーの入力に対して、英日あるいは日英の翻訳をしてください。";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Io,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Io, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Parse, message)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

/// Client settings stored as JSON. Credentials are never part of this file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub model: String,
    pub system_prompt: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: u32,
    pub streaming: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            streaming: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Missing fields take their defaults; malformed JSON is an error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json)
            .map_err(|error| ConfigError::parse(format!("failed to parse client config: {error}")))
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|error| {
            ConfigError::parse(format!("failed to serialize client config: {error}"))
        })
    }

    /// Reads `path`, falling back to defaults when it is absent or unreadable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        let loaded = fs::read_to_string(path)
            .map_err(|error| ConfigError::io(format!("failed to read client config: {error}")))
            .and_then(|json| Self::from_json_str(&json));

        match loaded {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(
                    event = "config_load_failed",
                    path = %path.display(),
                    error = %error
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                ConfigError::io(format!("failed to create config directory: {error}"))
            })?;
        }

        let json = self.to_json_string()?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|error| ConfigError::io(format!("failed to write client config: {error}")))?;
        fs::rename(&tmp, path)
            .map_err(|error| ConfigError::io(format!("failed to finalize client config: {error}")))
    }

    pub fn call_request(&self, user_message: impl Into<String>) -> CallRequest {
        let mut request = CallRequest::new(self.model.clone(), user_message)
            .with_max_output_tokens(self.max_output_tokens);

        if let Some(prompt) = non_blank(Some(self.system_prompt.as_str())) {
            request = request.with_system_prompt(prompt);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if self.streaming {
            request = request.enable_streaming();
        }
        request
    }
}

/// Picks the credential to use: the environment wins over `explicit`.
pub fn resolve_api_key(explicit: Option<&str>) -> Option<SecretString> {
    let from_env = std::env::var(API_KEY_ENV).ok();
    resolve_api_key_from(from_env.as_deref(), explicit)
}

pub fn resolve_api_key_from(env: Option<&str>, explicit: Option<&str>) -> Option<SecretString> {
    non_blank(env)
        .or_else(|| non_blank(explicit))
        .map(|key| SecretString::new(key.trim()))
}
