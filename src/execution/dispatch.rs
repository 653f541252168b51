//! Request dispatch
//!
//! The single HTTP entry point every client method goes through:
//! 1. Snapshot the current API key into the header set
//! 2. Layer configured and per-call headers over the defaults
//! 3. Attach query parameters (absent values dropped) and the body (read verbs never carry one)
//! 4. Send; no response at all is a `NoResponse` error
//! 5. Streaming: hand back the live response, no further checks
//! 6. Otherwise decode JSON regardless of HTTP status and reject a non-success `code`

use crate::client::DifyClient;
use crate::error::DifyError;
use crate::execution::headers::{HttpHeaderBuilder, apply_extra_headers};
use crate::routes::HttpMethod;
use crate::streaming::ResponseStream;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::collections::HashMap;

/// Success sentinel for the `code` field of a response envelope.
pub const SUCCESS_CODE: i64 = 200;

/// Query parameters; `None` values are left out of the query string.
pub type QueryParams<'a> = [(&'a str, Option<String>)];

/// Request payload.
#[derive(Debug)]
pub enum RequestBody {
    /// JSON body
    Json(Value),
    /// Multipart form body
    Multipart(reqwest::multipart::Form),
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Result of a dispatched request.
#[derive(Debug)]
pub enum ApiResponse {
    /// Decoded JSON body, unmodified
    Json(Value),
    /// Live streamed body
    Stream(ResponseStream),
}

impl ApiResponse {
    /// Whether the call was made in stream mode.
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    /// The decoded body; fails on a stream handle.
    pub fn into_json(self) -> Result<Value, DifyError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Stream(_) => Err(DifyError::UnexpectedResponseMode { expected: "JSON" }),
        }
    }

    /// The live handle; fails on a decoded body.
    pub fn into_stream(self) -> Result<ResponseStream, DifyError> {
        match self {
            Self::Stream(stream) => Ok(stream),
            Self::Json(_) => Err(DifyError::UnexpectedResponseMode {
                expected: "streaming",
            }),
        }
    }
}

impl DifyClient {
    /// Send one request to `endpoint` (a path appended to the base URL).
    ///
    /// - `body` is ignored for read verbs (`GET`, `HEAD`).
    /// - `extra_headers` replace default headers of the same name; multipart
    ///   uploads use this to swap in their `multipart/form-data` content type.
    /// - With `stream` set, the response is returned as a live handle and
    ///   neither the HTTP status nor the body is inspected.
    /// - Otherwise non-2xx responses are still decoded, and any body whose
    ///   `code` is present and not `200` fails with `DifyError::ApiError`.
    pub async fn send_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<RequestBody>,
        query: Option<&QueryParams<'_>>,
        stream: bool,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<ApiResponse, DifyError> {
        let url = format!("{}{}", self.base_url(), endpoint);
        let headers = self.build_headers(extra_headers)?;

        let mut builder = self.http_client().request(method.into(), &url);

        if let Some(query) = query {
            let pairs: Vec<(&str, &str)> = query
                .iter()
                .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v)))
                .collect();
            if !pairs.is_empty() {
                builder = builder.query(&pairs);
            }
        }

        match body {
            Some(_) if method.is_read() => {
                tracing::trace!(%method, %url, "dropping request body for read verb");
            }
            Some(RequestBody::Json(json)) => builder = builder.json(&json),
            Some(RequestBody::Multipart(form)) => builder = builder.multipart(form),
            None => {}
        }

        // Applied last so they replace anything the body encoders set.
        builder = builder.headers(headers);

        tracing::debug!(%method, %url, stream, "dispatching request");

        let response = builder
            .send()
            .await
            .map_err(|e| DifyError::NoResponse(e.to_string()))?;

        if stream {
            return Ok(ApiResponse::Stream(ResponseStream::new(response)));
        }

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DifyError::HttpError(e.to_string()))?;
        Ok(ApiResponse::Json(decode_checked(status, &text)?))
    }

    /// Header snapshot for one call: defaults, configured headers, then per-call headers.
    fn build_headers(
        &self,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<HeaderMap, DifyError> {
        let api_key = self.current_api_key();
        let mut headers = HttpHeaderBuilder::new()
            .with_bearer_auth(api_key.expose_secret())?
            .with_json_content_type()
            .with_custom_headers(&self.http_config().headers)?
            .build();
        if let Some(extra) = extra_headers {
            apply_extra_headers(&mut headers, extra)?;
        }
        Ok(headers)
    }
}

/// Decode a buffered body and apply the envelope check.
pub(crate) fn decode_checked(status: StatusCode, text: &str) -> Result<Value, DifyError> {
    let json = decode_body(status, text)?;
    check_envelope(&json)?;
    Ok(json)
}

/// Decode a buffered body. Empty bodies decode to `null`.
fn decode_body(status: StatusCode, text: &str) -> Result<Value, DifyError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(DifyError::ApiError {
            status: status.as_u16().to_string(),
            code: String::new(),
            message: text.to_string(),
            details: None,
        }),
        Err(e) => Err(DifyError::ParseError(format!(
            "Response body is not valid JSON: {e}"
        ))),
    }
}

/// Reject envelopes whose `code` is present (non-null) and not the success sentinel.
fn check_envelope(body: &Value) -> Result<(), DifyError> {
    match body.get("code") {
        None | Some(Value::Null) => Ok(()),
        Some(code) if is_success_code(code) => Ok(()),
        Some(_) => {
            let err = DifyError::from_envelope(body);
            tracing::debug!(error = %err, "response envelope reported failure");
            Err(err)
        }
    }
}

/// Numeric `200` in any JSON number form (`200`, `200.0`).
fn is_success_code(code: &Value) -> bool {
    code.as_i64() == Some(SUCCESS_CODE) || code.as_f64() == Some(SUCCESS_CODE as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn envelope_without_code_passes() {
        assert!(check_envelope(&json!({"result": "success"})).is_ok());
        assert!(check_envelope(&json!({"code": null})).is_ok());
        assert!(check_envelope(&json!([1, 2])).is_ok());
        assert!(check_envelope(&Value::Null).is_ok());
    }

    #[test]
    fn envelope_with_success_code_passes() {
        assert!(check_envelope(&json!({"code": 200, "data": []})).is_ok());
        assert!(check_envelope(&json!({"code": 200.0, "x": 1})).is_ok());
    }

    #[test]
    fn near_success_floats_fail() {
        assert!(check_envelope(&json!({"code": 200.5})).is_err());
        assert!(check_envelope(&json!({"code": 201})).is_err());
    }

    #[test]
    fn envelope_with_other_code_fails() {
        let err = check_envelope(&json!({"code": 400, "status": "error", "message": "bad"}))
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("error") && text.contains("400") && text.contains("bad"));

        // String codes never equal the numeric sentinel.
        assert!(check_envelope(&json!({"code": "200"})).is_err());
        assert!(check_envelope(&json!({"code": "not_found", "status": 404})).is_err());
    }

    #[test]
    fn decode_handles_empty_and_non_json_bodies() {
        assert_eq!(decode_body(StatusCode::NO_CONTENT, "").unwrap(), Value::Null);
        assert!(matches!(
            decode_body(StatusCode::OK, "<html>"),
            Err(DifyError::ParseError(_))
        ));
        let err = decode_body(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert_eq!(err.status_code(), Some(502));
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn api_response_mode_accessors() {
        let resp = ApiResponse::Json(json!({"a": 1}));
        assert!(!resp.is_stream());
        assert_eq!(resp.into_json().unwrap(), json!({"a": 1}));
        assert!(matches!(
            ApiResponse::Json(json!({})).into_stream(),
            Err(DifyError::UnexpectedResponseMode { .. })
        ));
    }

    #[tokio::test]
    #[traced_test]
    async fn dispatch_is_logged_without_the_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/meta"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tool_icons": {}})))
            .mount(&server)
            .await;

        let client = DifyClient::with_config(
            crate::config::DifyConfig::new("secret-app-key").with_base_url(server.uri()),
        )
        .unwrap();
        client
            .send_request(HttpMethod::Get, "/meta", None, None, false, None)
            .await
            .unwrap();

        assert!(logs_contain("dispatching request"));
        assert!(!logs_contain("secret-app-key"));
    }
}
