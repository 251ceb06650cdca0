//! Single-retry parameter negotiation and operational hook contracts.
//!
//! Some model families reject `temperature`. A call starts in
//! [`NegotiationState::WithTemperature`]; when the service rejects the
//! parameter the set is rebuilt without it and sent exactly once more. There
//! is no backoff and no further retry.
//!
//! ```rust
//! use qprovider::is_temperature_rejection;
//!
//! assert!(is_temperature_rejection("Unsupported parameter: 'temperature'"));
//! assert!(!is_temperature_rejection("rate_limit_exceeded"));
//! ```

use std::future::Future;

use qcommon::contains_any_ignore_case;

use crate::{ParameterSet, ParameterSetBuilder, ProviderError};

pub const TEMPERATURE_REJECTION_KEYWORDS: [&str; 5] = [
    "unsupported",
    "not supported",
    "unknown",
    "invalid",
    "unrecognized",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    WithTemperature,
    WithoutTemperature,
}

impl NegotiationState {
    pub fn attempt(self) -> u32 {
        match self {
            Self::WithTemperature => 1,
            Self::WithoutTemperature => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WithTemperature => "with_temperature",
            Self::WithoutTemperature => "without_temperature",
        }
    }
}

pub fn is_temperature_rejection(message: &str) -> bool {
    contains_any_ignore_case(message, &["temperature"])
        && contains_any_ignore_case(message, &TEMPERATURE_REJECTION_KEYWORDS)
}

pub trait ProviderOperationHooks: Send + Sync {
    fn on_attempt_start(&self, _operation: &str, _state: NegotiationState) {}

    fn on_negotiation_retry(&self, _operation: &str, _error: &ProviderError) {}

    fn on_success(&self, _operation: &str, _attempts: u32) {}

    fn on_failure(&self, _operation: &str, _attempts: u32, _error: &ProviderError) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl ProviderOperationHooks for NoopOperationHooks {}

/// Runs `execute` with the set built from `builder`, negotiating temperature away once.
///
/// The retry only happens when the first set actually carried a temperature;
/// every other failure, and any failure of the second attempt, is returned.
pub async fn execute_with_negotiation<T, Op, OpFuture>(
    operation: &str,
    builder: ParameterSetBuilder,
    hooks: &dyn ProviderOperationHooks,
    mut execute: Op,
) -> Result<T, ProviderError>
where
    Op: FnMut(ParameterSet) -> OpFuture,
    OpFuture: Future<Output = Result<T, ProviderError>>,
{
    let mut state = NegotiationState::WithTemperature;
    let mut params = builder.clone().build();

    loop {
        hooks.on_attempt_start(operation, state);
        let carried_temperature = params.has_temperature();

        match execute(params).await {
            Ok(value) => {
                hooks.on_success(operation, state.attempt());
                return Ok(value);
            }
            Err(error) => {
                if state == NegotiationState::WithTemperature
                    && carried_temperature
                    && is_temperature_rejection(&error.message)
                {
                    hooks.on_negotiation_retry(operation, &error);
                    state = NegotiationState::WithoutTemperature;
                    params = builder.clone().temperature(None).build();
                    continue;
                }

                hooks.on_failure(operation, state.attempt(), &error);
                return Err(error);
            }
        }
    }
}
