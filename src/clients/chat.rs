//! Chat app client
//!
//! Messages, conversations and speech-to-text for chat and agent apps.

use crate::client::DifyClient;
use crate::error::DifyError;
use crate::execution::ApiResponse;
use crate::routes;
use crate::types::requests::generation_body;
use crate::types::{ChatMessageRequest, FileInput};
use serde_json::{Value, json};

#[derive(Clone, Debug)]
pub struct ChatClient {
    base: DifyClient,
}

impl ChatClient {
    /// Wrap a base client; the two share key and transport.
    pub fn new(base: DifyClient) -> Self {
        Self { base }
    }

    /// Application-level operations (feedback, parameters, uploads, ...).
    pub fn base(&self) -> &DifyClient {
        &self.base
    }

    /// Send a chat message. With `stream` set the result is a live SSE stream.
    pub async fn create_chat_message(
        &self,
        request: ChatMessageRequest,
        stream: bool,
    ) -> Result<ApiResponse, DifyError> {
        let route = routes::CREATE_CHAT_MESSAGE;
        let body = generation_body(&request, stream)?;
        self.base
            .send_generation(route.method, &route.resolve(), body, stream)
            .await
    }

    /// Suggested follow-up questions for a message.
    pub async fn get_suggested(&self, message_id: &str, user: &str) -> Result<Value, DifyError> {
        let route = routes::GET_SUGGESTED;
        let query = [("user", Some(user.to_string()))];
        self.base
            .send_json(route.method, &route.resolve(message_id), None, Some(&query))
            .await
    }

    /// Stop a streaming generation by its task id.
    pub async fn stop_message(&self, task_id: &str, user: &str) -> Result<Value, DifyError> {
        let route = routes::STOP_CHAT_MESSAGE;
        self.base
            .send_json(
                route.method,
                &route.resolve(task_id),
                Some(json!({ "user": user })),
                None,
            )
            .await
    }

    /// List the user's conversations. Only `None` arguments are left out of the query.
    pub async fn get_conversations(
        &self,
        user: &str,
        first_id: Option<&str>,
        limit: Option<u32>,
        pinned: Option<bool>,
    ) -> Result<Value, DifyError> {
        let route = routes::GET_CONVERSATIONS;
        let query = [
            ("user", Some(user.to_string())),
            ("first_id", first_id.map(str::to_string)),
            ("limit", limit.map(|v| v.to_string())),
            ("pinned", pinned.map(|v| v.to_string())),
        ];
        self.base
            .send_json(route.method, &route.resolve(), None, Some(&query))
            .await
    }

    /// Message history, optionally scoped to one conversation.
    pub async fn get_conversation_messages(
        &self,
        user: &str,
        conversation_id: Option<&str>,
        first_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Value, DifyError> {
        let route = routes::GET_CONVERSATION_MESSAGES;
        let query = [
            ("user", Some(user.to_string())),
            ("conversation_id", conversation_id.map(str::to_string)),
            ("first_id", first_id.map(str::to_string)),
            ("limit", limit.map(|v| v.to_string())),
        ];
        self.base
            .send_json(route.method, &route.resolve(), None, Some(&query))
            .await
    }

    /// Rename a conversation, or let the server name it with `auto_generate`.
    pub async fn rename_conversation(
        &self,
        conversation_id: &str,
        name: Option<&str>,
        user: &str,
        auto_generate: bool,
    ) -> Result<Value, DifyError> {
        let route = routes::RENAME_CONVERSATION;
        let body = json!({ "name": name, "user": user, "auto_generate": auto_generate });
        self.base
            .send_json(route.method, &route.resolve(conversation_id), Some(body), None)
            .await
    }

    /// Delete a conversation for the given user.
    pub async fn delete_conversation(
        &self,
        conversation_id: &str,
        user: &str,
    ) -> Result<Value, DifyError> {
        let route = routes::DELETE_CONVERSATION;
        self.base
            .send_json(
                route.method,
                &route.resolve(conversation_id),
                Some(json!({ "user": user })),
                None,
            )
            .await
    }

    /// Transcribe an audio file.
    pub async fn audio_to_text(&self, file: FileInput, user: &str) -> Result<Value, DifyError> {
        let route = routes::AUDIO_TO_TEXT;
        let form = reqwest::multipart::Form::new()
            .part("file", file.into_part().await?)
            .text("user", user.to_string());
        self.base
            .send_multipart(route.method, &route.resolve(), form)
            .await
    }
}
