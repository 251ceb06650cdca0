//! Client construction from [`ClientConfig`](crate::ClientConfig).

use std::sync::Arc;
use std::time::Duration;

use qchat::ChatClient;
use qobserve::{SafeProviderHooks, TracingObservabilityHooks};
use qprovider::{
    ProviderError, ResponsesHttpTransport, ResponsesTransport, SecretString, looks_like_api_key,
};
use reqwest::Client;

use crate::ClientConfig;

pub fn http_transport(config: &ClientConfig) -> Result<Arc<dyn ResponsesTransport>, ProviderError> {
    let http = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;

    Ok(Arc::new(
        ResponsesHttpTransport::new(http).with_base_url(config.base_url.clone()),
    ))
}

/// Builds a client over the HTTP transport with tracing hooks installed.
///
/// A blank key is accepted here; every call made with it fails validation.
pub fn build_client(
    config: &ClientConfig,
    api_key: impl Into<SecretString>,
) -> Result<ChatClient, ProviderError> {
    let api_key = api_key.into();
    if !api_key.is_blank() && !looks_like_api_key(api_key.expose()) {
        tracing::warn!(event = "suspicious_api_key", "configured key does not look like an API key");
    }

    let transport = http_transport(config)?;
    Ok(client_with_transport(transport, api_key))
}

pub fn client_with_transport(
    transport: Arc<dyn ResponsesTransport>,
    api_key: impl Into<SecretString>,
) -> ChatClient {
    ChatClient::builder(transport)
        .api_key(api_key)
        .hooks(Arc::new(SafeProviderHooks::new(TracingObservabilityHooks)))
        .build()
}

#[cfg(test)]
mod tests {
    use qchat::{EMPTY_INPUT_MESSAGE, MISSING_API_KEY_MESSAGE};

    use super::*;

    #[tokio::test]
    async fn built_client_validates_before_touching_network() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..ClientConfig::default()
        };

        let client = build_client(&config, "sk-test-0123456789abcdef").expect("client");
        let result = client.send_message(config.call_request("   "), None, None).await;
        assert_eq!(result.error.as_deref(), Some(EMPTY_INPUT_MESSAGE));

        let keyless = build_client(&config, "").expect("client");
        let result = keyless.send_message(config.call_request("hi"), None, None).await;
        assert_eq!(result.error.as_deref(), Some(MISSING_API_KEY_MESSAGE));
        assert_eq!(keyless.list_models().await, None);
    }
}
