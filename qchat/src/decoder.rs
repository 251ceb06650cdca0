//! Incremental accumulation of a streamed reply.
//!
//! The cancellation signal is polled once per received event, before that
//! event is processed. A set signal closes the stream and returns whatever
//! was gathered so far.

use std::panic::{AssertUnwindSafe, catch_unwind};

use futures_util::StreamExt;
use qprovider::{ProviderError, ResponseEventStream, StreamEvent};
use tokio_util::sync::CancellationToken;

use crate::{ChunkCallback, StreamOutcome};

pub async fn decode_stream(
    mut events: ResponseEventStream<'_>,
    mut on_chunk: Option<&mut ChunkCallback<'_>>,
    cancel: Option<&CancellationToken>,
) -> Result<StreamOutcome, ProviderError> {
    let mut content = String::new();

    while let Some(item) = events.next().await {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            if let Err(error) = events.close() {
                tracing::debug!(event = "stream_close_failed", error = %error);
            }
            tracing::info!(event = "stream_cancelled", received_bytes = content.len());
            return Ok(StreamOutcome {
                content,
                cancelled: true,
            });
        }

        match item? {
            StreamEvent::DeltaText(payload) => {
                let delta = payload.text();
                if delta.is_empty() {
                    continue;
                }
                content.push_str(delta);
                if let Some(callback) = on_chunk.as_mut() {
                    deliver_chunk(&mut **callback, delta);
                }
            }
            event @ StreamEvent::Error { .. } => {
                if let Some(error) = event.into_error() {
                    return Err(error);
                }
            }
            StreamEvent::Other(kind) => {
                tracing::trace!(event = "stream_event_ignored", kind = %kind);
            }
        }
    }

    Ok(StreamOutcome {
        content,
        cancelled: false,
    })
}

fn deliver_chunk(callback: &mut ChunkCallback<'_>, delta: &str) {
    match catch_unwind(AssertUnwindSafe(|| callback(delta))) {
        Ok(Ok(())) => {}
        Ok(Err(error)) => {
            tracing::warn!(event = "chunk_callback_failed", error = %error);
        }
        Err(_) => {
            tracing::warn!(event = "chunk_callback_panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::ChunkError;

    fn deltas(parts: &[&str]) -> ResponseEventStream<'static> {
        ResponseEventStream::from_events(
            parts.iter().map(|part| Ok(StreamEvent::delta(*part))).collect(),
        )
    }

    #[tokio::test]
    async fn content_is_concatenation_of_non_empty_deltas() {
        let mut seen = Vec::new();
        let mut record = |chunk: &str| {
            seen.push(chunk.to_string());
            Ok::<(), ChunkError>(())
        };

        let outcome = decode_stream(deltas(&["Hel", "", "lo", " ", "世界"]), Some(&mut record), None)
            .await
            .expect("stream should decode");

        assert_eq!(outcome.content, "Hello 世界");
        assert!(!outcome.cancelled);
        assert_eq!(seen, ["Hel", "lo", " ", "世界"]);
    }

    #[tokio::test]
    async fn cancellation_before_event_k_keeps_first_k_minus_one() {
        for k in 1..=4 {
            let token = CancellationToken::new();
            let received = AtomicUsize::new(0);
            let mut trip = |_: &str| {
                if received.fetch_add(1, Ordering::SeqCst) + 1 == k - 1 {
                    token.cancel();
                }
                Ok::<(), ChunkError>(())
            };
            if k == 1 {
                token.cancel();
            }

            let outcome = decode_stream(deltas(&["a", "b", "c", "d"]), Some(&mut trip), Some(&token))
                .await
                .expect("cancelled stream is not an error");

            assert!(outcome.cancelled, "k = {k}");
            assert_eq!(outcome.content, "abcd"[..k - 1], "k = {k}");
        }
    }

    #[tokio::test]
    async fn cancel_closes_stream_and_swallows_close_failure() {
        let closed = Arc::new(AtomicUsize::new(0));
        let hook_closed = Arc::clone(&closed);
        let token = CancellationToken::new();
        token.cancel();

        let stream = deltas(&["a"]).with_close_hook(move || {
            hook_closed.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::transport("already closed"))
        });

        let outcome = decode_stream(stream, None, Some(&token))
            .await
            .expect("close failure is swallowed");
        assert!(outcome.cancelled);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn error_event_discards_partial_content() {
        let stream = ResponseEventStream::from_events(vec![
            Ok(StreamEvent::delta("partial")),
            Ok(StreamEvent::Other("response.created".to_string())),
            Ok(StreamEvent::error(Some("server_error"), "overloaded")),
            Ok(StreamEvent::delta("never")),
        ]);

        let error = decode_stream(stream, None, None)
            .await
            .expect_err("error event should fail the stream");
        assert_eq!(error.message, "server_error: overloaded");
    }

    #[tokio::test]
    async fn failing_and_panicking_callbacks_do_not_stop_the_stream() {
        let mut calls = 0;
        let mut flaky = |chunk: &str| {
            calls += 1;
            match chunk {
                "b" => Err::<(), ChunkError>("ui went away".into()),
                "c" => panic!("callback bug"),
                _ => Ok(()),
            }
        };

        let outcome = decode_stream(deltas(&["a", "b", "c", "d"]), Some(&mut flaky), None)
            .await
            .expect("callback failures are swallowed");

        assert_eq!(outcome.content, "abcd");
        assert_eq!(calls, 4);
    }
}
