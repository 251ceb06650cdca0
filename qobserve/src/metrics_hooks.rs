//! Metrics-based hooks for call attempts.
//!
//! ```rust
//! use qobserve::MetricsObservabilityHooks;
//! use qprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use qprovider::{NegotiationState, ProviderError, ProviderOperationHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, operation: &str, state: NegotiationState) {
        metrics::counter!(
            "quill_provider_attempt_start_total",
            "operation" => operation.to_string(),
            "negotiation" => state.as_str()
        )
        .increment(1);
    }

    fn on_negotiation_retry(&self, operation: &str, error: &ProviderError) {
        metrics::counter!(
            "quill_provider_negotiation_retry_total",
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_success(&self, operation: &str, attempts: u32) {
        metrics::counter!(
            "quill_provider_success_total",
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "quill_provider_attempts_per_success",
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(&self, operation: &str, attempts: u32, error: &ProviderError) {
        metrics::counter!(
            "quill_provider_failure_total",
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "quill_provider_attempts_per_failure",
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }
}
