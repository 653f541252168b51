//! File inputs for multipart uploads.

use crate::error::DifyError;
use reqwest::multipart::Part;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Boxed reader accepted as an already-open file.
pub type FileReader = Box<dyn AsyncRead + Send + Sync + Unpin + 'static>;

/// The file half of an upload: a path to open, an open reader, or bytes in memory.
pub enum FileInput {
    /// Opened when the request is built
    Path(PathBuf),
    /// Streamed as-is; `file_name` is reported to the server
    Reader { reader: FileReader, file_name: String },
    Bytes { bytes: Vec<u8>, file_name: String },
}

impl FileInput {
    /// File on disk, opened and streamed when the request is sent.
    pub fn path<P: Into<PathBuf>>(path: P) -> Self {
        Self::Path(path.into())
    }

    /// Already-open reader, streamed without a known length.
    pub fn reader<R, S>(reader: R, file_name: S) -> Self
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
        S: Into<String>,
    {
        Self::Reader {
            reader: Box::new(reader),
            file_name: file_name.into(),
        }
    }

    /// In-memory contents.
    pub fn bytes<B: Into<Vec<u8>>, S: Into<String>>(bytes: B, file_name: S) -> Self {
        Self::Bytes {
            bytes: bytes.into(),
            file_name: file_name.into(),
        }
    }

    /// Name reported in the multipart part; also drives MIME detection.
    pub fn file_name(&self) -> Option<String> {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            Self::Reader { file_name, .. } | Self::Bytes { file_name, .. } => {
                Some(file_name.clone())
            }
        }
    }

    /// Build the multipart part, opening the file for `Path` inputs.
    pub(crate) async fn into_part(self) -> Result<Part, DifyError> {
        let file_name = self.file_name().unwrap_or_else(|| "file".to_string());
        let mime = mime_guess::from_path(&file_name).first_or_octet_stream();

        let part = match self {
            Self::Path(path) => {
                let file = tokio::fs::File::open(&path).await.map_err(|e| {
                    DifyError::IoError(format!("Failed to open {}: {e}", path.display()))
                })?;
                let length = file.metadata().await?.len();
                Part::stream_with_length(reqwest::Body::wrap_stream(ReaderStream::new(file)), length)
            }
            Self::Reader { reader, .. } => {
                Part::stream(reqwest::Body::wrap_stream(ReaderStream::new(reader)))
            }
            Self::Bytes { bytes, .. } => Part::bytes(bytes),
        };

        part.file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(|e| DifyError::InvalidFile(format!("Invalid MIME type '{mime}': {e}")))
    }
}

impl fmt::Debug for FileInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Reader { file_name, .. } => f
                .debug_struct("Reader")
                .field("file_name", file_name)
                .finish_non_exhaustive(),
            Self::Bytes { bytes, file_name } => f
                .debug_struct("Bytes")
                .field("len", &bytes.len())
                .field("file_name", file_name)
                .finish(),
        }
    }
}

impl From<PathBuf> for FileInput {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for FileInput {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// Loosely-typed file option: a string is a path, anything else is rejected.
impl TryFrom<serde_json::Value> for FileInput {
    type Error = DifyError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(path) => Ok(Self::Path(PathBuf::from(path))),
            other => Err(DifyError::InvalidFile(format!(
                "expected a file path or readable stream, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_value_is_a_path() {
        let input = FileInput::try_from(json!("/tmp/report.pdf")).unwrap();
        assert!(matches!(input, FileInput::Path(_)));
        assert_eq!(input.file_name().as_deref(), Some("report.pdf"));
    }

    #[test]
    fn other_values_are_invalid() {
        let err = FileInput::try_from(json!(42)).unwrap_err();
        assert!(err.to_string().starts_with("Invalid file provided"));
        assert!(err.to_string().contains("a number"));
        assert!(FileInput::try_from(json!({"path": "x"})).is_err());
    }

    #[test]
    fn debug_hides_contents() {
        let input = FileInput::bytes(vec![1, 2, 3], "a.bin");
        assert_eq!(format!("{input:?}"), "Bytes { len: 3, file_name: \"a.bin\" }");
        let reader = FileInput::reader(tokio::io::empty(), "empty.txt");
        assert!(format!("{reader:?}").contains("empty.txt"));
    }

    #[tokio::test]
    async fn missing_path_fails_to_open() {
        let err = FileInput::path("/definitely/not/here.txt")
            .into_part()
            .await
            .unwrap_err();
        assert!(matches!(err, DifyError::IoError(_)));
    }

    #[tokio::test]
    async fn existing_path_builds_a_part() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"hello").unwrap();
        assert!(FileInput::path(file.path()).into_part().await.is_ok());
    }
}
