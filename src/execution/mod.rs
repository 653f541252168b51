//! HTTP execution layer shared by every client.

pub mod dispatch;
pub mod headers;

pub use dispatch::{ApiResponse, QueryParams, RequestBody, SUCCESS_CODE};
