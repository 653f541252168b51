//! Generation request types for completion, chat and workflow apps.
//!
//! `response_mode` is not a field of these types: it is derived from the
//! `stream` flag of the call, so the body and the dispatch mode always agree.

use super::common::{InputFile, ResponseMode};
use serde::Serialize;
use serde_json::{Map, Value};

fn empty_inputs() -> Value {
    Value::Object(Map::new())
}

/// Request for `POST /completion-messages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub inputs: Value,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<InputFile>>,
}

impl CompletionRequest {
    /// Empty `inputs` for `user`.
    pub fn new<S: Into<String>>(user: S) -> Self {
        Self {
            inputs: empty_inputs(),
            user: user.into(),
            files: None,
        }
    }

    pub fn with_inputs(mut self, inputs: Value) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_files(mut self, files: Vec<InputFile>) -> Self {
        self.files = Some(files);
        self
    }
}

/// Request for `POST /chat-messages`.
///
/// `conversation_id` is left out of the body entirely when `None`, which
/// starts a new conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessageRequest {
    pub inputs: Value,
    pub query: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<InputFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_generate_name: Option<bool>,
}

impl ChatMessageRequest {
    /// New conversation turn with empty `inputs`.
    pub fn new<Q: Into<String>, U: Into<String>>(query: Q, user: U) -> Self {
        Self {
            inputs: empty_inputs(),
            query: query.into(),
            user: user.into(),
            conversation_id: None,
            files: None,
            auto_generate_name: None,
        }
    }

    pub fn with_inputs(mut self, inputs: Value) -> Self {
        self.inputs = inputs;
        self
    }

    /// Continue an existing conversation.
    pub fn with_conversation_id<S: Into<String>>(mut self, conversation_id: S) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_files(mut self, files: Vec<InputFile>) -> Self {
        self.files = Some(files);
        self
    }

    /// Whether the server should title a new conversation.
    pub fn with_auto_generate_name(mut self, auto_generate_name: bool) -> Self {
        self.auto_generate_name = Some(auto_generate_name);
        self
    }
}

/// Request for `POST /workflows/run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowRunRequest {
    pub inputs: Value,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<InputFile>>,
}

impl WorkflowRunRequest {
    /// Empty `inputs` for `user`.
    pub fn new<S: Into<String>>(user: S) -> Self {
        Self {
            inputs: empty_inputs(),
            user: user.into(),
            files: None,
        }
    }

    pub fn with_inputs(mut self, inputs: Value) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_files(mut self, files: Vec<InputFile>) -> Self {
        self.files = Some(files);
        self
    }
}

#[derive(Serialize)]
struct WithResponseMode<'a, T: Serialize> {
    #[serde(flatten)]
    request: &'a T,
    response_mode: ResponseMode,
}

/// Serialize a generation request with `response_mode` set from `stream`.
pub(crate) fn generation_body<T: Serialize>(
    request: &T,
    stream: bool,
) -> Result<Value, serde_json::Error> {
    serde_json::to_value(WithResponseMode {
        request,
        response_mode: ResponseMode::from_stream(stream),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::common::FileType;
    use serde_json::json;

    #[test]
    fn chat_body_omits_missing_conversation_id() {
        let body = generation_body(&ChatMessageRequest::new("hi", "u1"), false).unwrap();
        assert_eq!(
            body,
            json!({"inputs": {}, "query": "hi", "user": "u1", "response_mode": "blocking"})
        );
        assert!(body.get("conversation_id").is_none());
    }

    #[test]
    fn chat_body_keeps_conversation_id_verbatim() {
        let request = ChatMessageRequest::new("hi", "u1").with_conversation_id("conv 42/x");
        let body = generation_body(&request, true).unwrap();
        assert_eq!(body["conversation_id"], "conv 42/x");
        assert_eq!(body["response_mode"], "streaming");
    }

    #[test]
    fn completion_body_carries_inputs_and_files() {
        let request = CompletionRequest::new("u1")
            .with_inputs(json!({"topic": "rust"}))
            .with_files(vec![InputFile::remote_url(FileType::Image, "https://x/y.png")]);
        let body = generation_body(&request, false).unwrap();
        assert_eq!(body["inputs"]["topic"], "rust");
        assert_eq!(body["files"][0]["transfer_method"], "remote_url");
        assert_eq!(body["response_mode"], "blocking");
    }

    #[test]
    fn workflow_body_defaults_to_empty_inputs() {
        let body = generation_body(&WorkflowRunRequest::new("u1"), true).unwrap();
        assert_eq!(
            body,
            json!({"inputs": {}, "user": "u1", "response_mode": "streaming"})
        );
    }
}
