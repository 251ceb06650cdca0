//! Common `qprovider` imports for downstream crates.

pub use crate::{
    ModelEntry, NoopOperationHooks, ParameterSet, ParameterSetBuilder, ProviderError,
    ProviderErrorKind, ProviderFuture, ProviderOperationHooks, ResponseEventStream,
    ResponseReply, ResponsesTransport, SecretString, StreamEvent, TokenParameter,
};
pub use qcommon::{BoxFuture, GenerationOptions};
