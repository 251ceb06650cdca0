//! Wire layer for the quill conversational client.
//!
//! This crate owns everything that touches the service protocol: building
//! the outbound [`ParameterSet`], decoding replies and stream events, the
//! [`ResponsesTransport`] seam, the single temperature negotiation retry and
//! model catalog ranking.
//!
//! ```rust
//! use qprovider::{ParameterSet, TokenParameter};
//!
//! let params = ParameterSet::builder("gpt-3.5-turbo", "hello").build();
//! assert_eq!(params.token_parameter, TokenParameter::MaxTokens);
//! ```

mod catalog;
mod credentials;
mod error;
mod negotiation;
mod request;
mod response;
mod serde_api;
mod stream;
mod transport;

#[cfg(feature = "http-transport")]
mod http;

pub mod prelude;

pub use catalog::{ALLOWED_MODEL_PREFIXES, ModelEntry, PRIORITY_ORDER, list_models, rank_models};
pub use credentials::{SecretString, looks_like_api_key};
pub use error::{ProviderError, ProviderErrorKind};
pub use negotiation::{
    NegotiationState, NoopOperationHooks, ProviderOperationHooks, TEMPERATURE_REJECTION_KEYWORDS,
    execute_with_negotiation, is_temperature_rejection,
};
pub use qcommon::{BoxFuture, GenerationOptions};
pub use request::{
    InputMessage, NEWER_MODEL_PREFIXES, ParameterSet, ParameterSetBuilder, Role, TokenParameter,
};
pub use response::{ContentPart, ItemContent, OutputItem, ResponseReply, extract_text};
pub use stream::{CloseHook, DeltaPayload, ResponseEventStream, StreamEvent};
pub use transport::ResponsesTransport;

#[cfg(feature = "http-transport")]
pub use http::{DEFAULT_BASE_URL, ResponsesHttpTransport};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;
