//! Request types.

pub mod common;
pub mod dataset;
pub mod file;
pub mod requests;

pub use common::{FileType, InputFile, Rating, ResponseMode, TransferMethod};
pub use dataset::{DocumentFileRequest, default_document_options};
pub use file::{FileInput, FileReader};
pub use requests::{ChatMessageRequest, CompletionRequest, WorkflowRunRequest};
