//! Outbound parameter set construction.
//!
//! ```rust
//! use qprovider::{ParameterSet, TokenParameter};
//!
//! let params = ParameterSet::builder("gpt-4o-mini", "Translate: hello")
//!     .instructions(Some("You are a translator."))
//!     .temperature(Some(0.7))
//!     .max_output_tokens(256)
//!     .build();
//!
//! assert_eq!(params.token_parameter, TokenParameter::MaxCompletionTokens);
//! assert_eq!(params.instructions.as_deref(), Some("You are a translator."));
//! assert!(!params.stream);
//! ```

use qcommon::{DEFAULT_MAX_OUTPUT_TOKENS, GenerationOptions, non_blank};
use serde_json::Value;

use crate::ProviderError;
use crate::serde_api::build_api_request;

/// Model identifier prefixes of the newer families that reject the legacy token field.
pub const NEWER_MODEL_PREFIXES: [&str; 4] = ["gpt-4o", "gpt-5", "o1-", "o3-"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenParameter {
    MaxTokens,
    MaxCompletionTokens,
}

impl TokenParameter {
    pub fn for_model(model: &str) -> Self {
        if NEWER_MODEL_PREFIXES
            .iter()
            .any(|prefix| model.starts_with(prefix))
        {
            Self::MaxCompletionTokens
        } else {
            Self::MaxTokens
        }
    }

    pub fn field_name(self) -> &'static str {
        match self {
            Self::MaxTokens => "max_tokens",
            Self::MaxCompletionTokens => "max_completion_tokens",
        }
    }
}

/// Author of an input turn. Steering text travels in `instructions`, so only
/// user turns are ever sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMessage {
    pub role: Role,
    pub content: String,
}

impl InputMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Negotiated payload for exactly one call attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub model: String,
    pub input: Vec<InputMessage>,
    pub instructions: Option<String>,
    pub temperature: Option<f32>,
    pub token_parameter: TokenParameter,
    pub max_output_tokens: u32,
    pub stream: bool,
}

impl ParameterSet {
    pub fn builder(model: impl Into<String>, user_message: impl Into<String>) -> ParameterSetBuilder {
        ParameterSetBuilder::new(model, user_message)
    }

    pub fn has_temperature(&self) -> bool {
        self.temperature.is_some()
    }

    /// Serializes the set the way it is sent on the wire.
    pub fn to_wire_json(&self) -> Result<Value, ProviderError> {
        serde_json::to_value(build_api_request(self))
            .map_err(|err| ProviderError::invalid_request(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSetBuilder {
    model: String,
    user_message: String,
    instructions: Option<String>,
    options: GenerationOptions,
}

impl ParameterSetBuilder {
    pub fn new(model: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            user_message: user_message.into(),
            instructions: None,
            options: GenerationOptions::default().with_max_output_tokens(DEFAULT_MAX_OUTPUT_TOKENS),
        }
    }

    /// Blank prompts are dropped so the field never reaches the wire empty.
    pub fn instructions(mut self, system_prompt: Option<&str>) -> Self {
        self.instructions = non_blank(system_prompt).map(str::to_string);
        self
    }

    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.options.temperature = temperature;
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.options.max_output_tokens = max_output_tokens;
        self
    }

    pub fn streaming(mut self, stream: bool) -> Self {
        self.options.stream = stream;
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> ParameterSet {
        let token_parameter = TokenParameter::for_model(&self.model);

        ParameterSet {
            model: self.model,
            input: vec![InputMessage::new(Role::User, self.user_message)],
            instructions: self.instructions,
            temperature: self.options.temperature,
            token_parameter,
            max_output_tokens: self.options.max_output_tokens,
            stream: self.options.stream,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn newer_family_prefixes_select_completion_token_field() {
        for prefix in NEWER_MODEL_PREFIXES {
            let model = format!("{prefix}variant");
            assert_eq!(
                TokenParameter::for_model(&model),
                TokenParameter::MaxCompletionTokens,
                "{model} should use the newer field"
            );
        }
    }

    #[test]
    fn other_identifiers_select_legacy_token_field() {
        for model in ["gpt-4-turbo", "gpt-3.5-turbo", "o1", "davinci-002", "model-x", ""] {
            assert_eq!(
                TokenParameter::for_model(model),
                TokenParameter::MaxTokens,
                "{model} should use the legacy field"
            );
        }
    }

    #[test]
    fn blank_system_prompt_is_omitted_from_wire_payload() {
        let params = ParameterSet::builder("gpt-3.5-turbo", "hi")
            .instructions(Some("   "))
            .temperature(Some(0.5))
            .max_output_tokens(64)
            .build();

        let wire = params.to_wire_json().expect("payload should serialize");
        assert_eq!(
            wire,
            json!({
                "model": "gpt-3.5-turbo",
                "input": [{ "role": "user", "content": "hi" }],
                "temperature": 0.5,
                "max_tokens": 64,
            })
        );
    }

    #[test]
    fn streaming_payload_carries_instructions_and_stream_flag() {
        let params = ParameterSet::builder("gpt-5-mini", "hi")
            .instructions(Some("Be brief."))
            .max_output_tokens(32)
            .streaming(true)
            .build();

        assert!(!params.has_temperature());
        let wire = params.to_wire_json().expect("payload should serialize");
        assert_eq!(wire["instructions"], "Be brief.");
        assert_eq!(wire["stream"], true);
        assert_eq!(wire["max_completion_tokens"], 32);
        assert!(wire.get("max_tokens").is_none());
        assert!(wire.get("temperature").is_none());
    }

    #[test]
    fn options_apply_all_generation_settings() {
        let options = GenerationOptions::default()
            .with_temperature(1.0)
            .with_max_output_tokens(10)
            .enable_streaming();
        let params = ParameterSet::builder("o3-mini", "hi").options(options).build();

        assert_eq!(params.temperature, Some(1.0));
        assert_eq!(params.max_output_tokens, 10);
        assert!(params.stream);
        assert_eq!(params.input, vec![InputMessage::new(Role::User, "hi")]);
    }
}
