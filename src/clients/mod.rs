//! Specialized clients
//!
//! Each client wraps a [`DifyClient`](crate::DifyClient) and adds the
//! endpoints of one application type. They are obtained from
//! `DifyClient::{completion, chat, workflow, datasets}` or built directly with `new`.

pub mod chat;
pub mod completion;
pub mod dataset;
pub mod workflow;

pub use chat::ChatClient;
pub use completion::CompletionClient;
pub use dataset::DatasetClient;
pub use workflow::WorkflowClient;
