//! Streamed responses
//!
//! A streaming call hands back the live response untouched. Consumption is up
//! to the caller: raw bytes (`bytes_stream`, `bytes`) or decoded server-sent
//! events (`events`). Dropping the handle cancels the transfer.

use crate::error::DifyError;
use bytes::Bytes;
use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::pin::Pin;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DifyError>> + Send>>;

pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, DifyError>> + Send>>;

/// Handle on a streamed response body.
///
/// Usually live; a body the client already had to read (to check a JSON error
/// envelope) is kept in memory and served through the same accessors.
#[derive(Debug)]
pub struct ResponseStream {
    body: StreamBody,
}

#[derive(Debug)]
enum StreamBody {
    Live(reqwest::Response),
    Buffered {
        status: StatusCode,
        headers: HeaderMap,
        bytes: Bytes,
    },
}

impl ResponseStream {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self {
            body: StreamBody::Live(response),
        }
    }

    /// HTTP status of the response. Not validated by the client.
    pub fn status(&self) -> u16 {
        self.status_code().as_u16()
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        match &self.body {
            StreamBody::Live(response) => response.status(),
            StreamBody::Buffered { status, .. } => *status,
        }
    }

    /// Response headers as received.
    pub fn headers(&self) -> &HeaderMap {
        match &self.body {
            StreamBody::Live(response) => response.headers(),
            StreamBody::Buffered { headers, .. } => headers,
        }
    }

    /// Raw `Content-Type` header, if present and valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Whether the body is declared as JSON (`application/json` or a `+json` type).
    pub fn is_json(&self) -> bool {
        self.content_type()
            .and_then(|ct| ct.split(';').next())
            .map(|essence| {
                let essence = essence.trim();
                essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
            })
            .unwrap_or(false)
    }

    /// The underlying response, if the body has not been read yet.
    pub fn into_response(self) -> Option<reqwest::Response> {
        match self.body {
            StreamBody::Live(response) => Some(response),
            StreamBody::Buffered { .. } => None,
        }
    }

    /// Raw body chunks as they arrive.
    pub fn bytes_stream(self) -> ByteStream {
        match self.body {
            StreamBody::Live(response) => Box::pin(
                response
                    .bytes_stream()
                    .map(|chunk| chunk.map_err(|e| DifyError::StreamError(e.to_string()))),
            ),
            StreamBody::Buffered { bytes, .. } => {
                Box::pin(futures_util::stream::once(async move { Ok::<_, DifyError>(bytes) }))
            }
        }
    }

    /// Buffer the whole body (e.g. generated audio).
    pub async fn bytes(self) -> Result<Bytes, DifyError> {
        match self.body {
            StreamBody::Live(response) => response
                .bytes()
                .await
                .map_err(|e| DifyError::HttpError(e.to_string())),
            StreamBody::Buffered { bytes, .. } => Ok(bytes),
        }
    }

    /// Read the body into memory, keeping status and headers.
    pub(crate) async fn buffer(self) -> Result<Self, DifyError> {
        match self.body {
            StreamBody::Live(response) => {
                let status = response.status();
                let headers = response.headers().clone();
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| DifyError::HttpError(e.to_string()))?;
                Ok(Self {
                    body: StreamBody::Buffered {
                        status,
                        headers,
                        bytes,
                    },
                })
            }
            buffered @ StreamBody::Buffered { .. } => Ok(Self { body: buffered }),
        }
    }

    /// The in-memory body, once buffered.
    pub(crate) fn buffered_bytes(&self) -> Option<&Bytes> {
        match &self.body {
            StreamBody::Live(_) => None,
            StreamBody::Buffered { bytes, .. } => Some(bytes),
        }
    }

    /// Decode the body as server-sent events carrying JSON payloads.
    pub fn events(self) -> EventStream {
        decode_events(self.bytes_stream())
    }
}

/// Parse an SSE byte stream into `StreamEvent`s.
///
/// Events with an empty `data:` payload (keep-alives, `event: ping`) are
/// skipped. The first malformed payload ends the stream with an error.
pub fn decode_events<S, B, E>(byte_stream: S) -> EventStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let out = async_stream::stream! {
        let mut sse_stream = Box::pin(byte_stream.eventsource());

        while let Some(item) = sse_stream.next().await {
            let event = match item {
                Ok(ev) => ev,
                Err(e) => {
                    yield Err(DifyError::StreamError(format!("SSE stream error: {e}")));
                    return;
                }
            };

            let data = event.data.trim();
            if data.is_empty() {
                continue;
            }

            let payload: Value = match serde_json::from_str(data) {
                Ok(v) => v,
                Err(e) => {
                    yield Err(DifyError::ParseError(format!("Failed to parse SSE JSON: {e}")));
                    return;
                }
            };

            yield Ok(StreamEvent::new(&event.event, payload));
        }
    };

    Box::pin(out)
}

/// One decoded server-sent event.
///
/// The event name comes from the payload's own `event` field when present,
/// otherwise from the SSE `event:` line.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEvent {
    event: String,
    data: Value,
}

impl StreamEvent {
    /// Event from its SSE `event:` name and decoded payload.
    pub fn new(sse_event: &str, data: Value) -> Self {
        let event = data
            .get("event")
            .and_then(Value::as_str)
            .unwrap_or(sse_event)
            .to_string();
        Self { event, data }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Take the decoded payload.
    pub fn into_data(self) -> Value {
        self.data
    }

    pub fn task_id(&self) -> Option<&str> {
        self.str_field("task_id")
    }

    pub fn message_id(&self) -> Option<&str> {
        self.str_field("message_id")
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.str_field("conversation_id")
    }

    /// Text delta of `message` / `agent_message` events.
    pub fn answer(&self) -> Option<&str> {
        self.str_field("answer")
    }

    /// Whether no further events are expected after this one.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.event.as_str(),
            "message_end" | "workflow_finished" | "error"
        )
    }

    /// An in-stream `error` event as a `DifyError`.
    pub fn error(&self) -> Option<DifyError> {
        (self.event == "error").then(|| DifyError::from_envelope(&self.data))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}
