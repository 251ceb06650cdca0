//! Transport seam between the client core and the network collaborator.

use crate::{
    ParameterSet, ProviderError, ProviderFuture, ResponseEventStream, ResponseReply, SecretString,
};

/// Performs one wire call per method invocation; never retries.
///
/// Implementations map every failure to a [`ProviderError`] whose `message`
/// carries the raw service text so the chat layer can classify it.
pub trait ResponsesTransport: Send + Sync + std::fmt::Debug {
    fn create<'a>(
        &'a self,
        params: ParameterSet,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<ResponseReply, ProviderError>>;

    fn stream<'a>(
        &'a self,
        params: ParameterSet,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<ResponseEventStream<'a>, ProviderError>>;

    fn list_models<'a>(
        &'a self,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<Vec<String>, ProviderError>>;
}
