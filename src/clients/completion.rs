//! Completion app client.

use crate::client::DifyClient;
use crate::error::DifyError;
use crate::execution::ApiResponse;
use crate::routes;
use crate::types::CompletionRequest;
use crate::types::requests::generation_body;

#[derive(Clone, Debug)]
pub struct CompletionClient {
    base: DifyClient,
}

impl CompletionClient {
    /// Wrap a base client; the two share key and transport.
    pub fn new(base: DifyClient) -> Self {
        Self { base }
    }

    /// Application-level operations (feedback, parameters, uploads, ...).
    pub fn base(&self) -> &DifyClient {
        &self.base
    }

    /// Generate a completion. With `stream` set the result is a live SSE stream.
    pub async fn create_completion_message(
        &self,
        request: CompletionRequest,
        stream: bool,
    ) -> Result<ApiResponse, DifyError> {
        let route = routes::CREATE_COMPLETION_MESSAGE;
        let body = generation_body(&request, stream)?;
        self.base
            .send_generation(route.method, &route.resolve(), body, stream)
            .await
    }
}
