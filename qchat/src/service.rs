//! Call orchestration for non-streaming and streaming requests.

use std::sync::Arc;

use qprovider::{
    ModelEntry, NoopOperationHooks, ParameterSet, ParameterSetBuilder, ProviderOperationHooks,
    ResponsesTransport, SecretString, execute_with_negotiation, extract_text, list_models,
};
use tokio_util::sync::CancellationToken;

use crate::{CallRequest, CallResult, ChatError, ChunkCallback, StreamOutcome, decode_stream};

/// Sends one turn per call; holds no per-call state, so clones share a transport.
#[derive(Clone)]
pub struct ChatClient {
    transport: Arc<dyn ResponsesTransport>,
    api_key: Arc<SecretString>,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("transport", &self.transport)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    pub fn new(transport: Arc<dyn ResponsesTransport>, api_key: impl Into<SecretString>) -> Self {
        Self::builder(transport).api_key(api_key).build()
    }

    pub fn builder(transport: Arc<dyn ResponsesTransport>) -> ChatClientBuilder {
        ChatClientBuilder::new(transport)
    }

    /// Performs one call and folds every failure into the returned [`CallResult`].
    ///
    /// `on_chunk` and `cancel` only matter for streaming requests.
    pub async fn send_message(
        &self,
        request: CallRequest,
        on_chunk: Option<&mut ChunkCallback<'_>>,
        cancel: Option<&CancellationToken>,
    ) -> CallResult {
        let result = self.try_send(request, on_chunk, cancel).await;
        if let Err(error) = &result {
            tracing::debug!(event = "send_message_failed", kind = ?error.kind, message = %error.message);
        }
        CallResult::from(result)
    }

    /// Lists usable models with the client credential. See [`list_models`].
    pub async fn list_models(&self) -> Option<Vec<ModelEntry>> {
        list_models(self.transport.as_ref(), self.api_key.expose()).await
    }

    async fn try_send(
        &self,
        request: CallRequest,
        on_chunk: Option<&mut ChunkCallback<'_>>,
        cancel: Option<&CancellationToken>,
    ) -> Result<StreamOutcome, ChatError> {
        let builder = self.prepare(&request)?;
        let api_key = self.api_key.as_ref();

        if !request.is_streaming() {
            let reply = execute_with_negotiation("create", builder, self.hooks.as_ref(), |params| {
                self.transport.create(params, api_key)
            })
            .await
            .map_err(ChatError::negotiation)?;

            return Ok(StreamOutcome {
                content: extract_text(&reply),
                cancelled: false,
            });
        }

        let events = execute_with_negotiation("stream", builder, self.hooks.as_ref(), |params| {
            self.transport.stream(params, api_key)
        })
        .await
        .map_err(ChatError::negotiation)?;

        decode_stream(events, on_chunk, cancel)
            .await
            .map_err(ChatError::stream)
    }

    fn prepare(&self, request: &CallRequest) -> Result<ParameterSetBuilder, ChatError> {
        if request.user_message.trim().is_empty() {
            return Err(ChatError::empty_input());
        }
        if self.api_key.is_blank() {
            return Err(ChatError::missing_api_key());
        }

        tracing::debug!(
            event = "send_message",
            model = %request.model,
            streaming = request.is_streaming()
        );

        Ok(
            ParameterSet::builder(request.model.clone(), request.user_message.clone())
                .instructions(request.system_prompt.as_deref())
                .options(request.options),
        )
    }
}

pub struct ChatClientBuilder {
    transport: Arc<dyn ResponsesTransport>,
    api_key: SecretString,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl ChatClientBuilder {
    pub fn new(transport: Arc<dyn ResponsesTransport>) -> Self {
        Self {
            transport,
            api_key: SecretString::new(""),
            hooks: Arc::new(NoopOperationHooks),
        }
    }

    pub fn api_key(mut self, api_key: impl Into<SecretString>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> ChatClient {
        ChatClient {
            transport: self.transport,
            api_key: Arc::new(self.api_key),
            hooks: self.hooks,
        }
    }
}
