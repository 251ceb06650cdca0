//! Tracing-based hooks for call attempts.
//!
//! ```rust
//! use qobserve::TracingObservabilityHooks;
//! use qprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use qprovider::{NegotiationState, ProviderError, ProviderOperationHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, operation: &str, state: NegotiationState) {
        tracing::info!(
            phase = "provider",
            event = "attempt_start",
            operation,
            attempt = state.attempt(),
            negotiation = state.as_str()
        );
    }

    fn on_negotiation_retry(&self, operation: &str, error: &ProviderError) {
        tracing::warn!(
            phase = "provider",
            event = "negotiation_retry",
            operation,
            dropped_parameter = "temperature",
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_success(&self, operation: &str, attempts: u32) {
        tracing::info!(phase = "provider", event = "success", operation, attempts);
    }

    fn on_failure(&self, operation: &str, attempts: u32, error: &ProviderError) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            operation,
            attempts,
            error_kind = ?error.kind,
            error = %error
        );
    }
}
