//! # dify-client
//!
//! Async client for the Dify application and knowledge base APIs.
//!
#![deny(unsafe_code)]

//! ## Layout
//!
//! - [`DifyClient`]: the base client. It holds the API key, base URL and HTTP
//!   client, and covers the endpoints shared by every app type.
//! - [`clients`]: completion, chat, workflow and dataset clients built on top of it.
//! - [`routes`]: the route table (verb and path template per endpoint).
//! - [`execution`]: request dispatch and the response-envelope check.
//! - [`streaming`]: live response handles and SSE event decoding.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dify_client::prelude::*;
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DifyClient::new("app-xxxxxxxx")?;
//!
//!     // Blocking mode: decoded JSON body
//!     let reply = client
//!         .chat()
//!         .create_chat_message(ChatMessageRequest::new("Hi there", "user-1"), false)
//!         .await?
//!         .into_json()?;
//!     println!("{}", reply["answer"]);
//!
//!     // Streaming mode: SSE events
//!     let mut events = client
//!         .chat()
//!         .create_chat_message(ChatMessageRequest::new("Tell me more", "user-1"), true)
//!         .await?
//!         .into_stream()?
//!         .events();
//!     while let Some(event) = events.next().await {
//!         if let Some(text) = event?.answer() {
//!             print!("{text}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod execution;
pub mod merge;
pub mod routes;
pub mod streaming;
pub mod types;

pub use client::DifyClient;
pub use clients::{ChatClient, CompletionClient, DatasetClient, WorkflowClient};
pub use config::{DEFAULT_BASE_URL, DifyConfig, HttpConfig};
pub use error::DifyError;
pub use execution::{ApiResponse, RequestBody};
pub use routes::HttpMethod;
pub use streaming::{ResponseStream, StreamEvent};

/// Common imports.
pub mod prelude {
    pub use crate::clients::{ChatClient, CompletionClient, DatasetClient, WorkflowClient};
    pub use crate::config::{DifyConfig, HttpConfig};
    pub use crate::error::DifyError;
    pub use crate::execution::ApiResponse;
    pub use crate::streaming::{ResponseStream, StreamEvent};
    pub use crate::types::{
        ChatMessageRequest, CompletionRequest, DocumentFileRequest, FileInput, FileType,
        InputFile, Rating, WorkflowRunRequest,
    };
    pub use crate::DifyClient;
}
