//! Knowledge base client
//!
//! Datasets, their documents and the segments documents are split into.
//! Creation calls deep-merge the caller's options over
//! [`default_document_options`]; update calls send only what the caller passes.

use crate::client::DifyClient;
use crate::error::DifyError;
use crate::merge::deep_merge;
use crate::routes::{self, HttpMethod};
use crate::types::{DocumentFileRequest, FileInput, default_document_options};
use serde_json::{Map, Value, json};

#[derive(Clone, Debug)]
pub struct DatasetClient {
    base: DifyClient,
}

impl DatasetClient {
    /// Wrap a base client; the two share key and transport.
    pub fn new(base: DifyClient) -> Self {
        Self { base }
    }

    /// Application-level operations (feedback, parameters, uploads, ...).
    pub fn base(&self) -> &DifyClient {
        &self.base
    }

    /// Create an empty dataset.
    pub async fn create_dataset(&self, name: &str) -> Result<Value, DifyError> {
        let route = routes::CREATE_DATASET;
        self.base
            .send_json(route.method, &route.resolve(), Some(json!({ "name": name })), None)
            .await
    }

    /// Page through the knowledge bases visible to the API key.
    pub async fn list_datasets(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Value, DifyError> {
        let route = routes::LIST_DATASETS;
        let query = [
            ("page", page.map(|v| v.to_string())),
            ("limit", limit.map(|v| v.to_string())),
        ];
        self.base
            .send_json(route.method, &route.resolve(), None, Some(&query))
            .await
    }

    /// Delete a dataset together with its documents.
    pub async fn delete_dataset(&self, dataset_id: &str) -> Result<Value, DifyError> {
        let route = routes::DELETE_DATASET;
        self.base
            .send_json(route.method, &route.resolve(dataset_id), None, None)
            .await
    }

    /// Create a document from raw text.
    ///
    /// `options` override the defaults key by key; `name` and `text` always win.
    pub async fn create_document_by_text(
        &self,
        dataset_id: &str,
        name: &str,
        text: &str,
        options: Option<Value>,
    ) -> Result<Value, DifyError> {
        let route = routes::CREATE_DOCUMENT_BY_TEXT;
        let mut body = merged_with_defaults(options);
        set_field(&mut body, "name", json!(name));
        set_field(&mut body, "text", json!(text));
        self.base
            .send_json(route.method, &route.resolve(dataset_id), Some(body), None)
            .await
    }

    /// Replace a document's name and/or text. No defaults are applied.
    pub async fn update_document_by_text(
        &self,
        dataset_id: &str,
        document_id: &str,
        name: Option<&str>,
        text: Option<&str>,
        options: Option<Value>,
    ) -> Result<Value, DifyError> {
        let route = routes::UPDATE_DOCUMENT_BY_TEXT;
        let mut body = object_or_empty(options);
        if let Some(name) = name {
            set_field(&mut body, "name", json!(name));
        }
        if let Some(text) = text {
            set_field(&mut body, "text", json!(text));
        }
        self.base
            .send_json(
                route.method,
                &route.resolve(dataset_id, document_id),
                Some(body),
                None,
            )
            .await
    }

    /// Create a document by uploading a file.
    ///
    /// Accepts a [`DocumentFileRequest`] or a loose JSON object with a `file`
    /// path; the file is validated before anything is sent.
    pub async fn create_document_by_file<R>(
        &self,
        dataset_id: &str,
        request: R,
    ) -> Result<Value, DifyError>
    where
        R: TryInto<DocumentFileRequest>,
        DifyError: From<R::Error>,
    {
        let route = routes::CREATE_DOCUMENT_BY_FILE;
        let (file, options) = request.try_into()?.into_parts()?;
        let data = merged_with_defaults(Some(options));
        self.upload_document(route.method, &route.resolve(dataset_id), file, data)
            .await
    }

    /// Replace a document's file. No defaults are applied.
    pub async fn update_document_by_file<R>(
        &self,
        dataset_id: &str,
        document_id: &str,
        request: R,
    ) -> Result<Value, DifyError>
    where
        R: TryInto<DocumentFileRequest>,
        DifyError: From<R::Error>,
    {
        let route = routes::UPDATE_DOCUMENT_BY_FILE;
        let (file, options) = request.try_into()?.into_parts()?;
        self.upload_document(
            route.method,
            &route.resolve(dataset_id, document_id),
            file,
            object_or_empty(Some(options)),
        )
        .await
    }

    async fn upload_document(
        &self,
        method: HttpMethod,
        endpoint: &str,
        file: FileInput,
        data: Value,
    ) -> Result<Value, DifyError> {
        let form = reqwest::multipart::Form::new()
            .part("file", file.into_part().await?)
            .text("data", serde_json::to_string(&data)?);
        self.base.send_multipart(method, endpoint, form).await
    }

    /// Documents of a dataset, optionally filtered by name keyword.
    pub async fn list_documents(
        &self,
        dataset_id: &str,
        keyword: Option<&str>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Value, DifyError> {
        let route = routes::LIST_DOCUMENTS;
        let query = [
            ("keyword", keyword.map(str::to_string)),
            ("page", page.map(|v| v.to_string())),
            ("limit", limit.map(|v| v.to_string())),
        ];
        self.base
            .send_json(route.method, &route.resolve(dataset_id), None, Some(&query))
            .await
    }

    /// Remove a document and its segments.
    pub async fn delete_document(
        &self,
        dataset_id: &str,
        document_id: &str,
    ) -> Result<Value, DifyError> {
        let route = routes::DELETE_DOCUMENT;
        self.base
            .send_json(
                route.method,
                &route.resolve(dataset_id, document_id),
                None,
                None,
            )
            .await
    }

    /// Embedding progress of the documents created in one batch.
    pub async fn get_indexing_status(
        &self,
        dataset_id: &str,
        batch: &str,
    ) -> Result<Value, DifyError> {
        let route = routes::GET_INDEXING_STATUS;
        self.base
            .send_json(route.method, &route.resolve(dataset_id, batch), None, None)
            .await
    }

    /// Append segments (each at least a `content` field) to a document.
    pub async fn add_segments(
        &self,
        dataset_id: &str,
        document_id: &str,
        segments: Vec<Value>,
    ) -> Result<Value, DifyError> {
        let route = routes::ADD_SEGMENTS;
        self.base
            .send_json(
                route.method,
                &route.resolve(dataset_id, document_id),
                Some(json!({ "segments": segments })),
                None,
            )
            .await
    }

    /// Segments of a document, filtered by keyword and/or status.
    pub async fn query_segments(
        &self,
        dataset_id: &str,
        document_id: &str,
        keyword: Option<&str>,
        status: Option<&str>,
    ) -> Result<Value, DifyError> {
        let route = routes::QUERY_SEGMENTS;
        let query = [
            ("keyword", keyword.map(str::to_string)),
            ("status", status.map(str::to_string)),
        ];
        self.base
            .send_json(
                route.method,
                &route.resolve(dataset_id, document_id),
                None,
                Some(&query),
            )
            .await
    }

    /// Replace the fields of one segment.
    pub async fn update_segment(
        &self,
        dataset_id: &str,
        document_id: &str,
        segment_id: &str,
        segment: Value,
    ) -> Result<Value, DifyError> {
        let route = routes::UPDATE_SEGMENT;
        self.base
            .send_json(
                route.method,
                &route.resolve(dataset_id, document_id, segment_id),
                Some(json!({ "segment": segment })),
                None,
            )
            .await
    }

    /// Remove one segment.
    pub async fn delete_segment(
        &self,
        dataset_id: &str,
        document_id: &str,
        segment_id: &str,
    ) -> Result<Value, DifyError> {
        let route = routes::DELETE_SEGMENT;
        self.base
            .send_json(
                route.method,
                &route.resolve(dataset_id, document_id, segment_id),
                None,
                None,
            )
            .await
    }
}

fn merged_with_defaults(options: Option<Value>) -> Value {
    match options {
        Some(options) => deep_merge(&default_document_options(), &options),
        None => default_document_options(),
    }
}

fn object_or_empty(options: Option<Value>) -> Value {
    match options {
        Some(value @ Value::Object(_)) => value,
        _ => Value::Object(Map::new()),
    }
}

fn set_field(body: &mut Value, key: &str, value: Value) {
    if !body.is_object() {
        *body = Value::Object(Map::new());
    }
    if let Value::Object(map) = body {
        map.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_options_override_defaults_key_by_key() {
        let body = merged_with_defaults(Some(json!({
            "process_rule": {"rules": {"segmentation": {"max_tokens": 500}}}
        })));
        let segmentation = &body["process_rule"]["rules"]["segmentation"];
        assert_eq!(segmentation["max_tokens"], 500);
        assert_eq!(segmentation["separator"], "\n");
        assert_eq!(body["indexing_technique"], "high_quality");
    }

    #[test]
    fn missing_options_yield_defaults() {
        assert_eq!(merged_with_defaults(None), default_document_options());
    }

    #[test]
    fn non_object_options_are_replaced_on_update() {
        assert_eq!(object_or_empty(Some(json!([1, 2]))), json!({}));
        assert_eq!(object_or_empty(None), json!({}));
    }

    #[test]
    fn set_field_overwrites_existing_keys() {
        let mut body = json!({"name": "old", "keep": true});
        set_field(&mut body, "name", json!("new"));
        assert_eq!(body, json!({"name": "new", "keep": true}));

        let mut scalar = json!(3);
        set_field(&mut scalar, "text", json!("t"));
        assert_eq!(scalar, json!({"text": "t"}));
    }
}
