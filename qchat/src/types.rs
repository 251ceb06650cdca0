//! Call request and outcome types.

use qcommon::GenerationOptions;

use crate::ChatError;

pub type ChunkError = Box<dyn std::error::Error + Send + Sync>;

/// Receives each non-empty text increment as it arrives.
///
/// Errors and panics raised here are logged and never abort the stream.
pub type ChunkCallback<'a> = dyn FnMut(&str) -> Result<(), ChunkError> + Send + 'a;

/// One user turn against a model.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    pub model: String,
    pub user_message: String,
    pub system_prompt: Option<String>,
    pub options: GenerationOptions,
}

impl CallRequest {
    pub fn new(model: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            user_message: user_message.into(),
            system_prompt: None,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options = self.options.with_temperature(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.options = self.options.with_max_output_tokens(max_output_tokens);
        self
    }

    pub fn enable_streaming(mut self) -> Self {
        self.options = self.options.enable_streaming();
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.options.stream
    }
}

/// Outcome of [`ChatClient::send_message`](crate::ChatClient::send_message).
///
/// Built only through the constructors, which keep `success` and `error`
/// consistent: a failure never carries content and a cancelled call still
/// counts as a success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallResult {
    pub success: bool,
    pub content: String,
    pub error: Option<String>,
    pub cancelled: bool,
}

impl CallResult {
    pub fn completed(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            error: None,
            cancelled: false,
        }
    }

    pub fn cancelled(partial_content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: partial_content.into(),
            error: None,
            cancelled: true,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(error.into()),
            cancelled: false,
        }
    }
}

/// Text gathered from a call before it finished or was cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamOutcome {
    pub content: String,
    pub cancelled: bool,
}

impl From<Result<StreamOutcome, ChatError>> for CallResult {
    fn from(value: Result<StreamOutcome, ChatError>) -> Self {
        match value {
            Ok(StreamOutcome {
                content,
                cancelled: true,
            }) => Self::cancelled(content),
            Ok(StreamOutcome { content, .. }) => Self::completed(content),
            Err(error) => Self::failed(error.message),
        }
    }
}
