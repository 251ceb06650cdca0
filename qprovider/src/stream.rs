//! Streaming event contracts and the closable event stream handle.
//!
//! ```rust
//! use qprovider::{DeltaPayload, ResponseEventStream, StreamEvent};
//!
//! let stream = ResponseEventStream::from_events(vec![Ok(StreamEvent::delta("hello"))]);
//! assert!(stream.close().is_ok());
//! assert_eq!(DeltaPayload::Absent.text(), "");
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use serde_json::{Map, Value};

use crate::ProviderError;

pub const OUTPUT_TEXT_DELTA: &str = "response.output_text.delta";
pub const ERROR_EVENT: &str = "error";
pub const RESPONSE_FAILED: &str = "response.failed";

const UNKNOWN_STREAM_ERROR: &str = "stream error";

/// Payload of a delta event, kept in whichever shape the transport produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaPayload {
    Text(String),
    Record(Map<String, Value>),
    Absent,
}

impl DeltaPayload {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(text)) => Self::Text(text.clone()),
            Some(Value::Object(record)) => Self::Record(record.clone()),
            _ => Self::Absent,
        }
    }

    /// Increment carried by this payload; records prefer a non-empty `text`, then `content`.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Record(record) => ["text", "content"]
                .iter()
                .find_map(|key| {
                    record
                        .get(*key)
                        .and_then(Value::as_str)
                        .filter(|text| !text.is_empty())
                })
                .unwrap_or(""),
            Self::Absent => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    DeltaText(DeltaPayload),
    Error {
        code: Option<String>,
        message: String,
    },
    Other(String),
}

impl StreamEvent {
    pub fn delta(text: impl Into<String>) -> Self {
        Self::DeltaText(DeltaPayload::Text(text.into()))
    }

    pub fn error(code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// Classifies one decoded server-sent event body by its `type` field.
    pub fn from_value(value: &Value) -> Self {
        let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();

        match kind {
            OUTPUT_TEXT_DELTA => Self::DeltaText(DeltaPayload::from_value(value.get("delta"))),
            ERROR_EVENT => Self::error_from(value.get("error").unwrap_or(value)),
            RESPONSE_FAILED => Self::error_from(
                value
                    .get("response")
                    .and_then(|response| response.get("error"))
                    .unwrap_or(&Value::Null),
            ),
            other => Self::Other(other.to_string()),
        }
    }

    fn error_from(value: &Value) -> Self {
        let code = value.get("code").and_then(Value::as_str);
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_STREAM_ERROR);

        Self::error(code, message)
    }

    pub fn into_error(self) -> Option<ProviderError> {
        match self {
            Self::Error { code, message } => Some(ProviderError::stream_event(code.as_deref(), message)),
            _ => None,
        }
    }
}

pub type CloseHook<'a> = Box<dyn FnOnce() -> Result<(), ProviderError> + Send + 'a>;

/// Ordered, finite sequence of events produced by a transport.
///
/// Invariants for consumers:
/// - Events are emitted in arrival order.
/// - Once the stream yields `None`, it must not yield additional items.
/// - [`close`](Self::close) releases the underlying connection; dropping does too,
///   but only `close` reports a failure.
pub struct ResponseEventStream<'a> {
    events: Pin<Box<dyn Stream<Item = Result<StreamEvent, ProviderError>> + Send + 'a>>,
    close_hook: Option<CloseHook<'a>>,
}

impl<'a> ResponseEventStream<'a> {
    pub fn new<S>(events: S) -> Self
    where
        S: Stream<Item = Result<StreamEvent, ProviderError>> + Send + 'a,
    {
        Self {
            events: Box::pin(events),
            close_hook: None,
        }
    }

    pub fn from_events(events: Vec<Result<StreamEvent, ProviderError>>) -> Self {
        Self::new(futures_util::stream::iter(events))
    }

    pub fn with_close_hook<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> Result<(), ProviderError> + Send + 'a,
    {
        self.close_hook = Some(Box::new(hook));
        self
    }

    pub fn close(mut self) -> Result<(), ProviderError> {
        match self.close_hook.take() {
            Some(hook) => hook(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for ResponseEventStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseEventStream")
            .field("close_hook", &self.close_hook.is_some())
            .finish_non_exhaustive()
    }
}

impl Stream for ResponseEventStream<'_> {
    type Item = Result<StreamEvent, ProviderError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().events.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use futures_util::StreamExt;
    use serde_json::json;

    use super::*;

    #[test]
    fn delta_payload_prefers_text_then_content() {
        let both = DeltaPayload::from_value(Some(&json!({ "text": "t", "content": "c" })));
        assert_eq!(both.text(), "t");

        let content_only = DeltaPayload::from_value(Some(&json!({ "content": "c" })));
        assert_eq!(content_only.text(), "c");

        let wrong_type = DeltaPayload::from_value(Some(&json!({ "text": 3, "content": "c" })));
        assert_eq!(wrong_type.text(), "c");

        let empty_text = DeltaPayload::from_value(Some(&json!({ "text": "", "content": "c" })));
        assert_eq!(empty_text.text(), "c");

        let raw = DeltaPayload::from_value(Some(&json!("raw")));
        assert_eq!(raw.text(), "raw");
    }

    #[test]
    fn unsupported_delta_shapes_are_empty_not_errors() {
        for value in [json!(null), json!(5), json!(["a"]), json!({ "other": "x" })] {
            assert_eq!(DeltaPayload::from_value(Some(&value)).text(), "");
        }
        assert_eq!(DeltaPayload::from_value(None), DeltaPayload::Absent);
    }

    #[test]
    fn server_events_are_classified_by_type() {
        let delta = StreamEvent::from_value(&json!({
            "type": "response.output_text.delta",
            "delta": "he"
        }));
        assert_eq!(delta, StreamEvent::delta("he"));

        let error = StreamEvent::from_value(&json!({
            "type": "error",
            "code": "rate_limit_exceeded",
            "message": "slow down"
        }));
        assert_eq!(error, StreamEvent::error(Some("rate_limit_exceeded"), "slow down"));

        let failed = StreamEvent::from_value(&json!({
            "type": "response.failed",
            "response": { "error": { "message": "server exploded" } }
        }));
        assert_eq!(failed, StreamEvent::error(None, "server exploded"));

        let other = StreamEvent::from_value(&json!({ "type": "response.created" }));
        assert_eq!(other, StreamEvent::Other("response.created".to_string()));
    }

    #[test]
    fn error_event_converts_to_stream_failure() {
        let error = StreamEvent::error(Some("server_error"), "boom")
            .into_error()
            .expect("error event should convert");
        assert_eq!(error.message, "server_error: boom");
        assert!(StreamEvent::delta("x").into_error().is_none());
    }

    #[tokio::test]
    async fn event_stream_yields_in_order_and_runs_close_hook() {
        let closed = Arc::new(AtomicBool::new(false));
        let mut stream = ResponseEventStream::from_events(vec![
            Ok(StreamEvent::delta("one")),
            Ok(StreamEvent::delta("two")),
        ])
        .with_close_hook({
            let closed = Arc::clone(&closed);
            move || {
                closed.store(true, Ordering::SeqCst);
                Ok(())
            }
        });

        assert_eq!(stream.next().await, Some(Ok(StreamEvent::delta("one"))));
        assert!(stream.close().is_ok());
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn exhausted_stream_stays_exhausted() {
        let mut stream = ResponseEventStream::from_events(vec![Ok(StreamEvent::delta("only"))]);
        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
        assert!(stream.next().await.is_none());
    }
}
