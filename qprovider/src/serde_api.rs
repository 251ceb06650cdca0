//! HTTP payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};

use crate::request::{ParameterSet, TokenParameter};

pub(crate) fn build_api_request(params: &ParameterSet) -> ApiParameterSet<'_> {
    let (max_tokens, max_completion_tokens) = match params.token_parameter {
        TokenParameter::MaxTokens => (Some(params.max_output_tokens), None),
        TokenParameter::MaxCompletionTokens => (None, Some(params.max_output_tokens)),
    };

    ApiParameterSet {
        model: &params.model,
        input: api_input(params),
        instructions: params.instructions.as_deref(),
        temperature: params.temperature,
        max_tokens,
        max_completion_tokens,
        stream: params.stream,
    }
}

/// Body for the `/responses` endpoint, which only accepts `max_output_tokens`
/// whatever the model family.
#[cfg_attr(not(feature = "http-transport"), allow(dead_code))]
pub(crate) fn build_responses_request(params: &ParameterSet) -> ApiResponsesRequest<'_> {
    ApiResponsesRequest {
        model: &params.model,
        input: api_input(params),
        instructions: params.instructions.as_deref(),
        temperature: params.temperature,
        max_output_tokens: params.max_output_tokens,
        stream: params.stream,
    }
}

fn api_input(params: &ParameterSet) -> Vec<ApiInputMessage<'_>> {
    params
        .input
        .iter()
        .map(|message| ApiInputMessage {
            role: message.role.as_str(),
            content: &message.content,
        })
        .collect()
}

#[cfg_attr(not(feature = "http-transport"), allow(dead_code))]
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ApiErrorEnvelope>(body).ok()?;
    Some(match parsed.error.code {
        Some(code) if !parsed.error.message.contains(&code) => {
            format!("{code}: {}", parsed.error.message)
        }
        _ => parsed.error.message,
    })
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiParameterSet<'a> {
    pub model: &'a str,
    pub input: Vec<ApiInputMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "is_false")]
    pub stream: bool,
}

#[derive(Debug, Serialize)]
#[cfg_attr(not(feature = "http-transport"), allow(dead_code))]
pub(crate) struct ApiResponsesRequest<'a> {
    pub model: &'a str,
    pub input: Vec<ApiInputMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "is_false")]
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiInputMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "http-transport"), allow(dead_code))]
pub(crate) struct ApiModelList {
    #[serde(default)]
    pub data: Vec<ApiModel>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "http-transport"), allow(dead_code))]
pub(crate) struct ApiModel {
    pub id: String,
}
