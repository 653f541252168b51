//! Shared request vocabulary.

use serde::{Deserialize, Serialize};

/// How the server should deliver a generation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// One buffered JSON body
    Blocking,
    /// Server-sent events
    Streaming,
}

impl ResponseMode {
    /// `Streaming` when `stream` is set, else `Blocking`.
    pub fn from_stream(stream: bool) -> Self {
        if stream {
            Self::Streaming
        } else {
            Self::Blocking
        }
    }
}

/// Message feedback rating. `None` at the call site revokes a previous rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Like,
    Dislike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Document,
    Audio,
    Video,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMethod {
    /// The server fetches the file from `url`
    RemoteUrl,
    /// A file previously sent through the upload endpoint
    LocalFile,
}

/// A file attached to a completion, chat or workflow input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub transfer_method: TransferMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_file_id: Option<String>,
}

impl InputFile {
    /// Attachment fetched by the server from `url`.
    pub fn remote_url<S: Into<String>>(file_type: FileType, url: S) -> Self {
        Self {
            file_type,
            transfer_method: TransferMethod::RemoteUrl,
            url: Some(url.into()),
            upload_file_id: None,
        }
    }

    /// Attachment referring to an earlier upload.
    pub fn local_file<S: Into<String>>(file_type: FileType, upload_file_id: S) -> Self {
        Self {
            file_type,
            transfer_method: TransferMethod::LocalFile,
            url: None,
            upload_file_id: Some(upload_file_id.into()),
        }
    }
}
