//! Shared helpers for the mock-server tests.

#![allow(dead_code)]

use dify_client::{DifyClient, DifyConfig};
use wiremock::MockServer;

pub const API_KEY: &str = "app-test-key";

/// Client pointed at the mock server.
pub fn client_for(server: &MockServer) -> DifyClient {
    DifyClient::with_config(DifyConfig::new(API_KEY).with_base_url(server.uri()))
        .expect("valid config")
}

/// Load an `.sse` fixture from `tests/fixtures`.
pub fn sse_fixture(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let raw = std::fs::read_to_string(&path).expect("fixture exists");
    raw.replace("\r\n", "\n").into_bytes()
}

/// Header value of a recorded request, if present and valid UTF-8.
pub fn header_value<'a>(request: &'a wiremock::Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}
