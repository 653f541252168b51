//! Error Handling Module
//!
//! Every public operation returns `Result<T, DifyError>`. A call either fully
//! succeeds or fails with exactly one of the variants below; nothing is
//! retried or swallowed inside the library.
//!
//! # Example
//!
//! ```rust,ignore
//! use dify_client::DifyError;
//!
//! match client.get_meta("user-1").await {
//!     Err(DifyError::ApiError { code, .. }) => eprintln!("rejected with {code}"),
//!     Err(e) if e.is_no_response() => eprintln!("server unreachable"),
//!     other => { /* ... */ }
//! }
//! ```

use std::convert::Infallible;
use thiserror::Error;

/// Errors produced by the Dify client.
#[derive(Error, Debug)]
pub enum DifyError {
    /// The transport produced no response at all (connect/DNS/TLS failure, invalid URL).
    #[error("No response from server: {0}")]
    NoResponse(String),

    /// The decoded body carried a non-success `code` field.
    #[error("API error: {status} {code} {message}")]
    ApiError {
        /// `status` field of the body (the HTTP status line when the body had none)
        status: String,
        /// `code` field of the body
        code: String,
        /// `message` field of the body
        message: String,
        /// The decoded body, when there was one
        details: Option<serde_json::Value>,
    },

    /// A file-bearing operation was called without a `file`.
    #[error("No file provided")]
    MissingFile,

    /// The `file` option was neither a path nor a readable stream.
    #[error("Invalid file provided: {0}")]
    InvalidFile(String),

    /// A request argument had the wrong shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid client configuration or header values.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Reading a received response body failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// A successful response body was not valid JSON.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Decoding a streamed response failed.
    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("IO error: {0}")]
    IoError(String),

    /// A JSON body was requested from a streamed response, or the reverse.
    #[error("Unexpected response mode: expected a {expected} response")]
    UnexpectedResponseMode { expected: &'static str },
}

impl DifyError {
    /// Build an `ApiError` from the `status`/`code`/`message` fields of a decoded body.
    pub fn from_envelope(body: &serde_json::Value) -> Self {
        Self::ApiError {
            status: field_text(body.get("status")),
            code: field_text(body.get("code")),
            message: field_text(body.get("message")),
            details: Some(body.clone()),
        }
    }

    /// Numeric status of an `ApiError`, when its `status` parses as one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => status.parse().ok(),
            _ => None,
        }
    }

    /// The `code` of an `ApiError`.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::ApiError { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Whether the server was never reached.
    pub fn is_no_response(&self) -> bool {
        matches!(self, Self::NoResponse(_))
    }
}

/// Render an envelope field for error text: strings unquoted, absent as empty.
fn field_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl From<serde_json::Error> for DifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for DifyError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<Infallible> for DifyError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_error_mentions_status_code_and_message() {
        let err = DifyError::from_envelope(&json!({
            "code": 400,
            "status": "error",
            "message": "bad"
        }));
        let text = err.to_string();
        assert!(text.contains("error"));
        assert!(text.contains("400"));
        assert!(text.contains("bad"));
        assert_eq!(err.api_code(), Some("400"));
    }

    #[test]
    fn envelope_error_with_string_code_and_numeric_status() {
        let err = DifyError::from_envelope(&json!({
            "code": "invalid_param",
            "status": 400,
            "message": "query is required"
        }));
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(
            err.to_string(),
            "API error: 400 invalid_param query is required"
        );
    }

    #[test]
    fn file_errors_have_descriptive_text() {
        assert_eq!(DifyError::MissingFile.to_string(), "No file provided");
        assert!(
            DifyError::InvalidFile("number".into())
                .to_string()
                .starts_with("Invalid file provided")
        );
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: DifyError = json_err.into();
        assert!(matches!(err, DifyError::JsonError(_)));
    }

    #[test]
    fn no_response_is_detected() {
        let err = DifyError::NoResponse("connection refused".into());
        assert!(err.is_no_response());
        assert!(err.to_string().starts_with("No response from server"));
        assert_eq!(err.status_code(), None);
    }
}
