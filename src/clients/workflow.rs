//! Workflow app client.

use crate::client::DifyClient;
use crate::error::DifyError;
use crate::execution::ApiResponse;
use crate::routes;
use crate::types::WorkflowRunRequest;
use crate::types::requests::generation_body;
use serde_json::{Value, json};

#[derive(Clone, Debug)]
pub struct WorkflowClient {
    base: DifyClient,
}

impl WorkflowClient {
    /// Wrap a base client; the two share key and transport.
    pub fn new(base: DifyClient) -> Self {
        Self { base }
    }

    /// Application-level operations (feedback, parameters, uploads, ...).
    pub fn base(&self) -> &DifyClient {
        &self.base
    }

    /// Execute the published workflow.
    pub async fn run(
        &self,
        request: WorkflowRunRequest,
        stream: bool,
    ) -> Result<ApiResponse, DifyError> {
        let route = routes::RUN_WORKFLOW;
        let body = generation_body(&request, stream)?;
        self.base
            .send_generation(route.method, &route.resolve(), body, stream)
            .await
    }

    /// Stop a streaming run by its task id.
    pub async fn stop(&self, task_id: &str, user: &str) -> Result<Value, DifyError> {
        let route = routes::STOP_WORKFLOW;
        self.base
            .send_json(
                route.method,
                &route.resolve(task_id),
                Some(json!({ "user": user })),
                None,
            )
            .await
    }

    /// Status, outputs and timings of a finished or running workflow run.
    pub async fn get_run(&self, workflow_run_id: &str) -> Result<Value, DifyError> {
        let route = routes::GET_WORKFLOW_RUN;
        self.base
            .send_json(route.method, &route.resolve(workflow_run_id), None, None)
            .await
    }
}
