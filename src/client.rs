//! Base client
//!
//! `DifyClient` owns the API key, base URL and HTTP client, and exposes the
//! application-level endpoints (feedback, parameters, uploads, text-to-audio,
//! meta). The specialized clients (`chat()`, `completion()`, `workflow()`,
//! `datasets()`) share its state: cloning is cheap and every clone sees key
//! rotations.
//!
//! # Example
//! ```rust,no_run
//! use dify_client::DifyClient;
//! use dify_client::types::ChatMessageRequest;
//!
//! # async fn demo() -> Result<(), dify_client::DifyError> {
//! let client = DifyClient::new("app-xxxxxxxx")?;
//! let answer = client
//!     .chat()
//!     .create_chat_message(ChatMessageRequest::new("Hello", "user-1"), false)
//!     .await?
//!     .into_json()?;
//! println!("{}", answer["answer"]);
//! # Ok(()) }
//! ```

use crate::clients::{ChatClient, CompletionClient, DatasetClient, WorkflowClient};
use crate::config::{DifyConfig, HttpConfig};
use crate::error::DifyError;
use crate::execution::headers::multipart_headers;
use crate::execution::dispatch::decode_checked;
use crate::execution::{ApiResponse, QueryParams, RequestBody};
use crate::routes::{self, HttpMethod};
use crate::streaming::ResponseStream;
use crate::types::{FileInput, Rating};
use secrecy::SecretString;
use serde_json::{Value, json};
use std::fmt;
use std::sync::{Arc, RwLock};

struct ClientInner {
    api_key: RwLock<SecretString>,
    base_url: String,
    http_config: HttpConfig,
    http_client: reqwest::Client,
}

/// Client for the application API.
#[derive(Clone)]
pub struct DifyClient {
    inner: Arc<ClientInner>,
}

impl DifyClient {
    /// Client against the production endpoint.
    pub fn new<S: Into<String>>(api_key: S) -> Result<Self, DifyError> {
        Self::with_config(DifyConfig::new(api_key))
    }

    /// Client from a full configuration; builds its own `reqwest::Client`.
    pub fn with_config(config: DifyConfig) -> Result<Self, DifyError> {
        let http_client = config.http_config.build_client()?;
        Self::with_http_client(config, http_client)
    }

    /// Use a caller-built `reqwest::Client`; `config.http_config` still supplies default headers.
    pub fn with_http_client(
        config: DifyConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, DifyError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                api_key: RwLock::new(config.api_key),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                http_config: config.http_config,
                http_client,
            }),
        })
    }

    /// Replace the API key for all subsequent calls on this client and its clones.
    ///
    /// Requests already dispatched keep the key they were sent with.
    pub fn update_api_key<S: Into<String>>(&self, api_key: S) {
        let mut guard = self
            .inner
            .api_key
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = SecretString::from(api_key.into());
        tracing::debug!("API key rotated");
    }

    /// Base URL with any trailing `/` removed.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub(crate) fn current_api_key(&self) -> SecretString {
        self.inner
            .api_key
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.inner.http_client
    }

    pub(crate) fn http_config(&self) -> &HttpConfig {
        &self.inner.http_config
    }

    /// Client for completion (text generator) apps.
    pub fn completion(&self) -> CompletionClient {
        CompletionClient::new(self.clone())
    }

    /// Client for chat, agent and chatflow apps.
    pub fn chat(&self) -> ChatClient {
        ChatClient::new(self.clone())
    }

    /// Client for workflow apps.
    pub fn workflow(&self) -> WorkflowClient {
        WorkflowClient::new(self.clone())
    }

    /// Client for the knowledge base API (use a dataset API key).
    pub fn datasets(&self) -> DatasetClient {
        DatasetClient::new(self.clone())
    }

    /// Dispatch a JSON (or bodyless) request and return the decoded body.
    pub(crate) async fn send_json(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<Value>,
        query: Option<&QueryParams<'_>>,
    ) -> Result<Value, DifyError> {
        self.send_request(method, endpoint, body.map(RequestBody::Json), query, false, None)
            .await?
            .into_json()
    }

    /// Dispatch a multipart form, overriding the content type with its boundary.
    pub(crate) async fn send_multipart(
        &self,
        method: HttpMethod,
        endpoint: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value, DifyError> {
        let extra_headers = multipart_headers(form.boundary());
        self.send_request(
            method,
            endpoint,
            Some(RequestBody::Multipart(form)),
            None,
            false,
            Some(&extra_headers),
        )
        .await?
        .into_json()
    }

    /// Rate a message; `None` clears an earlier rating.
    pub async fn message_feedback(
        &self,
        message_id: &str,
        rating: Option<Rating>,
        user: &str,
    ) -> Result<Value, DifyError> {
        let route = routes::FEEDBACK;
        let body = json!({ "rating": rating, "user": user });
        self.send_json(route.method, &route.resolve(message_id), Some(body), None)
            .await
    }

    /// Input form, opening statement and feature switches of the application.
    pub async fn get_application_parameters(&self, user: &str) -> Result<Value, DifyError> {
        let route = routes::APPLICATION;
        let query = [("user", Some(user.to_string()))];
        self.send_json(route.method, &route.resolve(), None, Some(&query))
            .await
    }

    /// Upload a file for later use as a `local_file` input.
    pub async fn file_upload(&self, file: FileInput, user: &str) -> Result<Value, DifyError> {
        let route = routes::FILE_UPLOAD;
        let form = reqwest::multipart::Form::new()
            .part("file", file.into_part().await?)
            .text("user", user.to_string());
        self.send_multipart(route.method, &route.resolve(), form).await
    }

    /// Synthesize speech. The body is audio, so the result is always a response handle.
    ///
    /// With `streaming` set the handle is returned untouched. Otherwise a JSON or
    /// non-2xx body is read and checked like any other call, so a server error
    /// envelope fails with `DifyError::ApiError`.
    pub async fn text_to_audio(
        &self,
        text: &str,
        user: &str,
        streaming: bool,
    ) -> Result<ResponseStream, DifyError> {
        let route = routes::TEXT_TO_AUDIO;
        let body = json!({ "text": text, "user": user, "streaming": streaming });
        let response = self
            .send_request(
                route.method,
                &route.resolve(),
                Some(RequestBody::Json(body)),
                None,
                true,
                None,
            )
            .await?
            .into_stream()?;

        if streaming || (response.status_code().is_success() && !response.is_json()) {
            return Ok(response);
        }

        let response = response.buffer().await?;
        if let Some(bytes) = response.buffered_bytes() {
            decode_checked(response.status_code(), &String::from_utf8_lossy(bytes))?;
        }
        Ok(response)
    }

    /// Tool icons and other application metadata.
    pub async fn get_meta(&self, user: &str) -> Result<Value, DifyError> {
        let route = routes::GET_META;
        let query = [("user", Some(user.to_string()))];
        self.send_json(route.method, &route.resolve(), None, Some(&query))
            .await
    }

    /// Name, description and tags of the application.
    pub async fn get_app_info(&self, user: &str) -> Result<Value, DifyError> {
        let route = routes::GET_INFO;
        let query = [("user", Some(user.to_string()))];
        self.send_json(route.method, &route.resolve(), None, Some(&query))
            .await
    }

    /// Dispatch through a streaming-capable route.
    pub(crate) async fn send_generation(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Value,
        stream: bool,
    ) -> Result<ApiResponse, DifyError> {
        self.send_request(method, endpoint, Some(RequestBody::Json(body)), None, stream, None)
            .await
    }
}

impl fmt::Debug for DifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DifyClient")
            .field("base_url", &self.inner.base_url)
            .field("has_custom_headers", &!self.inner.http_config.headers.is_empty())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn rotation_is_shared_between_clones() {
        let client = DifyClient::new("old-key").unwrap();
        let chat = client.chat();
        client.update_api_key("new-key");
        assert_eq!(chat.base().current_api_key().expose_secret(), "new-key");
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(DifyClient::new("").is_err());
        let err = DifyClient::with_config(DifyConfig::new("k").with_base_url("ftp://x")).unwrap_err();
        assert!(matches!(err, DifyError::ConfigurationError(_)));
    }

    #[test]
    fn debug_hides_key() {
        let client = DifyClient::new("app-very-secret").unwrap();
        let text = format!("{client:?}");
        assert!(text.contains("https://api.dify.ai/v1"));
        assert!(!text.contains("app-very-secret"));
    }
}
