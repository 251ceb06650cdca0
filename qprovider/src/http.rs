//! reqwest-based implementation of [`ResponsesTransport`].

use std::fmt::Display;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{Client, Request, Response, StatusCode};
use serde_json::Value;

use crate::serde_api::{ApiModelList, build_responses_request, extract_error_message};
use crate::{
    ParameterSet, ProviderError, ProviderFuture, ResponseEventStream, ResponseReply,
    ResponsesTransport, SecretString, StreamEvent,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct ResponsesHttpTransport {
    client: Client,
    base_url: String,
}

impl ResponsesHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn build_request(
        &self,
        params: &ParameterSet,
        api_key: &SecretString,
    ) -> Result<Request, ProviderError> {
        self.client
            .post(self.endpoint("responses"))
            .bearer_auth(api_key.expose())
            .json(&build_responses_request(params))
            .build()
            .map_err(|err| ProviderError::invalid_request(err.to_string()))
    }

    async fn post(
        &self,
        params: &ParameterSet,
        api_key: &SecretString,
    ) -> Result<Response, ProviderError> {
        let request = self.build_request(params, api_key)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        Ok(response)
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("request failed with status {status}"));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(message)
            }
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                ProviderError::invalid_request(message)
            }
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                ProviderError::unavailable(message)
            }
            _ => ProviderError::transport(message),
        }
    }
}

fn map_send_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(err.to_string())
    } else if err.is_connect() {
        ProviderError::transport(format!("connection error: {err}"))
    } else {
        ProviderError::transport(err.to_string())
    }
}

enum SseLine {
    Event(StreamEvent),
    Done,
    Skip,
}

fn parse_sse_line(raw_line: &[u8]) -> Result<SseLine, ProviderError> {
    let line = std::str::from_utf8(raw_line)
        .map_err(|err| ProviderError::transport(err.to_string()))?
        .trim();

    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(SseLine::Skip);
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(SseLine::Skip);
    }
    if payload == "[DONE]" {
        return Ok(SseLine::Done);
    }

    let parsed: Value = serde_json::from_str(payload)
        .map_err(|err| ProviderError::transport(format!("malformed stream payload: {err}")))?;
    Ok(SseLine::Event(StreamEvent::from_value(&parsed)))
}

/// Turns raw server-sent event bytes into stream events.
///
/// Lines are split on raw bytes, so a chunk boundary may fall inside a
/// multi-byte character. Decoding stops at `[DONE]` or when the body ends.
fn decode_sse<'a, S, B, E>(chunks: S) -> impl Stream<Item = Result<StreamEvent, ProviderError>> + Send + 'a
where
    S: Stream<Item = Result<B, E>> + Send + 'a,
    B: AsRef<[u8]> + Send + 'a,
    E: Display + Send + 'a,
{
    try_stream! {
        let mut chunks = Box::pin(chunks);
        let mut sse_buffer = Vec::<u8>::new();
        let mut finished = false;

        while let Some(item) = chunks.next().await {
            let bytes = item.map_err(|err| ProviderError::transport(err.to_string()))?;
            sse_buffer.extend_from_slice(bytes.as_ref());

            while let Some(newline_index) = sse_buffer.iter().position(|byte| *byte == b'\n') {
                let raw_line = sse_buffer.drain(..=newline_index).collect::<Vec<u8>>();
                match parse_sse_line(&raw_line)? {
                    SseLine::Event(event) => yield event,
                    SseLine::Done => {
                        finished = true;
                        break;
                    }
                    SseLine::Skip => {}
                }
            }

            if finished {
                break;
            }
        }

        if !finished && !sse_buffer.is_empty() {
            if let SseLine::Event(event) = parse_sse_line(&sse_buffer)? {
                yield event;
            }
        }
    }
}

impl ResponsesTransport for ResponsesHttpTransport {
    fn create<'a>(
        &'a self,
        mut params: ParameterSet,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<ResponseReply, ProviderError>> {
        Box::pin(async move {
            params.stream = false;
            let response = self.post(&params, api_key).await?;
            let body: Value = response
                .json()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            Ok(ResponseReply::from_value(&body))
        })
    }

    fn stream<'a>(
        &'a self,
        mut params: ParameterSet,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<ResponseEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            params.stream = true;
            let response = self.post(&params, api_key).await?;

            let events = decode_sse(response.bytes_stream());
            Ok(ResponseEventStream::new(events))
        })
    }

    fn list_models<'a>(
        &'a self,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<Vec<String>, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.endpoint("models"))
                .bearer_auth(api_key.expose())
                .send()
                .await
                .map_err(map_send_error)?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            let parsed: ApiModelList = response
                .json()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            Ok(parsed.data.into_iter().map(|model| model.id).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures_util::stream;
    use serde_json::json;

    use super::*;
    use crate::ProviderErrorKind;

    async fn decode_chunks(chunks: &[&[u8]]) -> Vec<Result<StreamEvent, ProviderError>> {
        let chunks = chunks
            .iter()
            .map(|chunk| Ok::<_, std::io::Error>(chunk.to_vec()))
            .collect::<Vec<_>>();
        decode_sse(stream::iter(chunks)).collect().await
    }

    #[test]
    fn request_body_uses_max_output_tokens_for_responses_endpoint() {
        let transport =
            ResponsesHttpTransport::new(Client::new()).with_base_url("http://localhost:8080/v1");
        let params = ParameterSet::builder("gpt-4o-mini", "hi")
            .max_output_tokens(256)
            .build();

        let request = transport
            .build_request(&params, &SecretString::new("sk-test-0123456789abcdef"))
            .expect("request should build");

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:8080/v1/responses");
        assert_eq!(
            request
                .headers()
                .get(reqwest::header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok()),
            Some("Bearer sk-test-0123456789abcdef")
        );

        let bytes = request
            .body()
            .and_then(|body| body.as_bytes())
            .expect("json body should be buffered");
        let body: Value = serde_json::from_slice(bytes).expect("body should be json");
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "input": [{"role": "user", "content": "hi"}],
                "max_output_tokens": 256
            })
        );
        assert!(body.get("max_completion_tokens").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn sse_decoder_joins_characters_split_across_chunks() {
        let line = "data: {\"type\":\"response.output_text.delta\",\"delta\":\"こ\"}\n";
        let bytes = line.as_bytes();
        let split = bytes
            .iter()
            .position(|byte| *byte == 0xE3)
            .expect("line should contain a multi-byte character")
            + 1;

        let events = decode_chunks(&[&bytes[..split], &bytes[split..]]).await;

        assert_eq!(events, vec![Ok(StreamEvent::delta("こ"))]);
    }

    #[tokio::test]
    async fn sse_decoder_stops_at_done_marker() {
        let events = decode_chunks(&[
            "data: {\"type\":\"response.output_text.delta\",\"delta\":\"a\"}\n".as_bytes(),
            "data: [DONE]\n".as_bytes(),
            "data: {\"type\":\"response.output_text.delta\",\"delta\":\"b\"}\n".as_bytes(),
        ])
        .await;

        assert_eq!(events, vec![Ok(StreamEvent::delta("a"))]);
    }

    #[tokio::test]
    async fn sse_decoder_skips_event_names_comments_and_blank_payloads() {
        let events = decode_chunks(&[
            "event: response.output_text.delta\n".as_bytes(),
            ": keep-alive\n\n".as_bytes(),
            "data:\n".as_bytes(),
            "data:   \r\n".as_bytes(),
            "data: {\"type\":\"response.output_text.delta\",\"delta\":\"ok\"}\r\n".as_bytes(),
        ])
        .await;

        assert_eq!(events, vec![Ok(StreamEvent::delta("ok"))]);
    }

    #[tokio::test]
    async fn sse_decoder_surfaces_failed_response_as_error_event() {
        let events = decode_chunks(&[
            "data: {\"type\":\"response.failed\",\"response\":{\"error\":{\"code\":\"server_error\",\"message\":\"boom\"}}}\n".as_bytes(),
        ])
        .await;

        assert_eq!(
            events,
            vec![Ok(StreamEvent::error(Some("server_error"), "boom"))]
        );
    }

    #[tokio::test]
    async fn sse_decoder_fails_on_malformed_json_after_earlier_events() {
        let events = decode_chunks(&[
            "data: {\"type\":\"response.output_text.delta\",\"delta\":\"a\"}\n".as_bytes(),
            "data: {not json\n".as_bytes(),
        ])
        .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], Ok(StreamEvent::delta("a")));
        let error = events[1].clone().expect_err("malformed payload should fail");
        assert_eq!(error.kind, ProviderErrorKind::Transport);
        assert!(error.message.starts_with("malformed stream payload"));
    }

    #[tokio::test]
    async fn sse_decoder_processes_trailing_line_without_newline() {
        let events = decode_chunks(&[
            "data: {\"type\":\"response.output_text.delta\",\"delta\":\"tail\"}".as_bytes(),
        ])
        .await;

        assert_eq!(events, vec![Ok(StreamEvent::delta("tail"))]);
    }

    #[tokio::test]
    async fn sse_decoder_propagates_chunk_errors() {
        let chunks = vec![
            Ok(b"data: {\"type\":\"response.output_text.delta\",\"delta\":\"a\"}\n".to_vec()),
            Err(std::io::Error::other("connection reset")),
        ];

        let events: Vec<_> = decode_sse(stream::iter(chunks)).collect().await;

        assert_eq!(events[0], Ok(StreamEvent::delta("a")));
        let error = events[1].clone().expect_err("chunk error should propagate");
        assert_eq!(error.kind, ProviderErrorKind::Transport);
        assert_eq!(error.message, "connection reset");
    }

    #[test]
    fn endpoint_joins_base_url_without_double_slash() {
        let transport =
            ResponsesHttpTransport::new(Client::new()).with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            transport.endpoint("responses"),
            "http://localhost:8080/v1/responses"
        );
    }

    #[test]
    fn default_base_url_targets_public_api() {
        let transport = ResponsesHttpTransport::new(Client::new());
        assert_eq!(transport.endpoint("models"), "https://api.openai.com/v1/models");
    }
}
