//! Dataset document options.
//!
//! Document creation bodies start from [`default_document_options`] and the
//! caller's options are deep-merged over them (see [`crate::merge`]).

use super::file::FileInput;
use crate::error::DifyError;
use serde_json::{Map, Value, json};

/// Segmentation defaults: split on newlines, at most 1000 tokens per segment.
pub fn default_document_options() -> Value {
    json!({
        "indexing_technique": "high_quality",
        "process_rule": {
            "mode": "custom",
            "rules": {
                "pre_processing_rules": [
                    {"id": "remove_extra_spaces", "enabled": true},
                    {"id": "remove_urls_emails", "enabled": true}
                ],
                "segmentation": {
                    "separator": "\n",
                    "max_tokens": 1000
                }
            }
        }
    })
}

/// Options for creating or updating a document from a file.
///
/// `options` is sent as the JSON `data` field of the multipart body; the file
/// itself goes in the `file` field.
#[derive(Debug)]
pub struct DocumentFileRequest {
    pub file: Option<FileInput>,
    pub options: Value,
}

impl DocumentFileRequest {
    /// Request for `file` with no extra options.
    pub fn new<F: Into<FileInput>>(file: F) -> Self {
        Self {
            file: Some(file.into()),
            options: Value::Object(Map::new()),
        }
    }

    /// Options sent in the `data` part (`file` must not be among them).
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    /// Split into the file and the options, failing when no file was given.
    pub(crate) fn into_parts(self) -> Result<(FileInput, Value), DifyError> {
        let file = self.file.ok_or(DifyError::MissingFile)?;
        Ok((file, self.options))
    }
}

/// Parse a loose options object: `file` must be a path string when present.
/// The `file` key is stripped from the remaining options.
impl TryFrom<Value> for DocumentFileRequest {
    type Error = DifyError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut options = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(DifyError::InvalidInput(format!(
                    "document options must be an object, got {other}"
                )));
            }
        };

        let file = match options.remove("file") {
            None | Some(Value::Null) => None,
            Some(value) => Some(FileInput::try_from(value)?),
        };

        Ok(Self {
            file,
            options: Value::Object(options),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_split_on_newline_with_1000_tokens() {
        let defaults = default_document_options();
        let segmentation = &defaults["process_rule"]["rules"]["segmentation"];
        assert_eq!(segmentation["separator"], "\n");
        assert_eq!(segmentation["max_tokens"], 1000);
    }

    #[test]
    fn loose_options_extract_and_strip_file() {
        let request = DocumentFileRequest::try_from(json!({
            "file": "/tmp/a.txt",
            "indexing_technique": "economy"
        }))
        .unwrap();
        assert!(matches!(request.file, Some(FileInput::Path(_))));
        assert_eq!(request.options, json!({"indexing_technique": "economy"}));
    }

    #[test]
    fn missing_file_is_reported_on_split() {
        let request = DocumentFileRequest::try_from(json!({"name": "x"})).unwrap();
        assert!(matches!(request.into_parts(), Err(DifyError::MissingFile)));
    }

    #[test]
    fn non_path_file_is_invalid() {
        let err = DocumentFileRequest::try_from(json!({"file": 7})).unwrap_err();
        assert!(matches!(err, DifyError::InvalidFile(_)));
    }
}
