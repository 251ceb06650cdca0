//! Unified facade over the quill workspace crates.
//!
//! Most applications only need this crate: load a [`ClientConfig`], resolve
//! a credential and call [`build_client`].
//!
//! ```rust,no_run
//! use quill::{CancellationToken, ClientConfig, build_client, resolve_api_key};
//!
//! # async fn run() -> Result<(), quill::ProviderError> {
//! let config = ClientConfig::load("config.json");
//! let api_key = resolve_api_key(None).unwrap_or_else(|| "".into());
//! let client = build_client(&config, api_key)?;
//!
//! let cancel = CancellationToken::new();
//! let mut on_chunk = |chunk: &str| {
//!     print!("{chunk}");
//!     Ok::<(), quill::ChunkError>(())
//! };
//! let result = client
//!     .send_message(config.call_request("こんにちは"), Some(&mut on_chunk), Some(&cancel))
//!     .await;
//! println!("\nsuccess={} cancelled={}", result.success, result.cancelled);
//! # Ok(())
//! # }
//! ```

mod config;

pub mod prelude;
pub mod runtime;

pub use qchat;
pub use qcommon;
pub use qobserve;
pub use qprovider;

pub use config::{
    API_KEY_ENV, ClientConfig, ConfigError, ConfigErrorKind, DEFAULT_MODEL,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, resolve_api_key,
    resolve_api_key_from,
};
pub use qchat::{
    CallRequest, CallResult, CancellationToken, ChatClient, ChatClientBuilder, ChatError,
    ChatErrorKind, ChunkCallback, ChunkError, EMPTY_INPUT_MESSAGE, ErrorCategory,
    MISSING_API_KEY_MESSAGE, classify_error,
};
pub use qcommon::{BoxFuture, GenerationOptions};
pub use qobserve::{MetricsObservabilityHooks, SafeProviderHooks, TracingObservabilityHooks};
pub use qprovider::{
    ModelEntry, NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderOperationHooks, ResponseEventStream, ResponseReply, ResponsesTransport, SecretString,
    StreamEvent, looks_like_api_key,
};
pub use runtime::{build_client, client_with_transport, http_transport};
