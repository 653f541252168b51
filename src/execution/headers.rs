//! HTTP header construction
//!
//! Every request starts from bearer auth plus a JSON content type; configured
//! default headers and then per-call headers are layered on top, later layers
//! replacing earlier ones key by key.

use crate::error::DifyError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    /// Create an empty header builder
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add Bearer token authorization
    pub fn with_bearer_auth(mut self, token: &str) -> Result<Self, DifyError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            DifyError::ConfigurationError(format!("Invalid API key format: {e}"))
        })?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Add JSON content type
    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    /// Add multiple custom headers, replacing any already present.
    pub fn with_custom_headers(
        mut self,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Self, DifyError> {
        apply_extra_headers(&mut self.headers, custom_headers)?;
        Ok(self)
    }

    /// Build the final HeaderMap
    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call headers for a multipart body with the given boundary.
pub fn multipart_headers(boundary: &str) -> HashMap<String, String> {
    HashMap::from([(
        CONTENT_TYPE.as_str().to_string(),
        format!("multipart/form-data; boundary={boundary}"),
    )])
}

/// Apply extra headers in place; an extra header replaces a base header of the same name.
pub fn apply_extra_headers(
    base: &mut HeaderMap,
    extra: &HashMap<String, String>,
) -> Result<(), DifyError> {
    for (key, value) in extra {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            DifyError::ConfigurationError(format!("Invalid header name '{key}': {e}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            DifyError::ConfigurationError(format!("Invalid header value for '{key}': {e}"))
        })?;
        base.insert(name, value);
    }
    Ok(())
}
