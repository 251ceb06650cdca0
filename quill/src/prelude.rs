//! Common imports for most quill applications.

pub use crate::{
    CallRequest, CallResult, CancellationToken, ChatClient, ChatClientBuilder, ChatError,
    ChatErrorKind, ChunkCallback, ChunkError, ClientConfig, ConfigError, ConfigErrorKind,
    ErrorCategory, GenerationOptions, ModelEntry, ProviderError, ProviderErrorKind,
    ResponsesTransport, SecretString, build_client, classify_error, client_with_transport,
    http_transport, resolve_api_key,
};
