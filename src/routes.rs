//! Route table
//!
//! One `const` per API operation, pairing the HTTP verb with a path builder.
//! The path builder's arity is part of the route's type, so a route that needs
//! a dataset id and a document id cannot be resolved with only one of them.
//!
//! Path parameters are substituted verbatim; escaping is left to the caller.
//! Query strings and bodies are supplied by the calling method, never here.

use std::fmt;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    /// Read verbs never carry a request body.
    pub const fn is_read(self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }

    /// Upper-case verb as it appears on the request line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Head => Self::HEAD,
        }
    }
}

pub type Path0 = fn() -> String;
pub type Path1 = fn(&str) -> String;
pub type Path2 = fn(&str, &str) -> String;
pub type Path3 = fn(&str, &str, &str) -> String;

/// A route descriptor: verb plus path builder.
#[derive(Clone, Copy)]
pub struct Route<P> {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: P,
}

impl<P> fmt::Debug for Route<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("method", &self.method)
            .finish()
    }
}

impl Route<Path0> {
    /// Path of a route without parameters.
    pub fn resolve(&self) -> String {
        (self.path)()
    }
}

impl Route<Path1> {
    /// Path with its single id filled in.
    pub fn resolve(&self, a: &str) -> String {
        (self.path)(a)
    }
}

impl Route<Path2> {
    /// Path with both ids filled in, in template order.
    pub fn resolve(&self, a: &str, b: &str) -> String {
        (self.path)(a, b)
    }
}

impl Route<Path3> {
    /// Path with all three ids filled in, in template order.
    pub fn resolve(&self, a: &str, b: &str, c: &str) -> String {
        (self.path)(a, b, c)
    }
}

// Application-level

pub const FEEDBACK: Route<Path1> = Route {
    name: "feedback",
    method: HttpMethod::Post,
    path: |message_id: &str| format!("/messages/{message_id}/feedbacks"),
};

pub const APPLICATION: Route<Path0> = Route {
    name: "application",
    method: HttpMethod::Get,
    path: || "/parameters".to_string(),
};

pub const FILE_UPLOAD: Route<Path0> = Route {
    name: "fileUpload",
    method: HttpMethod::Post,
    path: || "/files/upload".to_string(),
};

pub const TEXT_TO_AUDIO: Route<Path0> = Route {
    name: "textToAudio",
    method: HttpMethod::Post,
    path: || "/text-to-audio".to_string(),
};

pub const GET_META: Route<Path0> = Route {
    name: "getMeta",
    method: HttpMethod::Get,
    path: || "/meta".to_string(),
};

pub const GET_INFO: Route<Path0> = Route {
    name: "getInfo",
    method: HttpMethod::Get,
    path: || "/info".to_string(),
};

// Completion

pub const CREATE_COMPLETION_MESSAGE: Route<Path0> = Route {
    name: "createCompletionMessage",
    method: HttpMethod::Post,
    path: || "/completion-messages".to_string(),
};

// Chat

pub const CREATE_CHAT_MESSAGE: Route<Path0> = Route {
    name: "createChatMessage",
    method: HttpMethod::Post,
    path: || "/chat-messages".to_string(),
};

pub const GET_SUGGESTED: Route<Path1> = Route {
    name: "getSuggested",
    method: HttpMethod::Get,
    path: |message_id: &str| format!("/messages/{message_id}/suggested"),
};

pub const STOP_CHAT_MESSAGE: Route<Path1> = Route {
    name: "stopChatMessage",
    method: HttpMethod::Post,
    path: |task_id: &str| format!("/chat-messages/{task_id}/stop"),
};

pub const GET_CONVERSATIONS: Route<Path0> = Route {
    name: "getConversations",
    method: HttpMethod::Get,
    path: || "/conversations".to_string(),
};

pub const GET_CONVERSATION_MESSAGES: Route<Path0> = Route {
    name: "getConversationMessages",
    method: HttpMethod::Get,
    path: || "/messages".to_string(),
};

pub const RENAME_CONVERSATION: Route<Path1> = Route {
    name: "renameConversation",
    method: HttpMethod::Post,
    path: |conversation_id: &str| format!("/conversations/{conversation_id}/name"),
};

pub const DELETE_CONVERSATION: Route<Path1> = Route {
    name: "deleteConversation",
    method: HttpMethod::Delete,
    path: |conversation_id: &str| format!("/conversations/{conversation_id}"),
};

pub const AUDIO_TO_TEXT: Route<Path0> = Route {
    name: "audioToText",
    method: HttpMethod::Post,
    path: || "/audio-to-text".to_string(),
};

// Workflow

pub const RUN_WORKFLOW: Route<Path0> = Route {
    name: "runWorkflow",
    method: HttpMethod::Post,
    path: || "/workflows/run".to_string(),
};

pub const STOP_WORKFLOW: Route<Path1> = Route {
    name: "stopWorkflow",
    method: HttpMethod::Post,
    path: |task_id: &str| format!("/workflows/{task_id}/stop"),
};

pub const GET_WORKFLOW_RUN: Route<Path1> = Route {
    name: "getWorkflowRun",
    method: HttpMethod::Get,
    path: |workflow_run_id: &str| format!("/workflows/run/{workflow_run_id}"),
};

// Datasets

pub const CREATE_DATASET: Route<Path0> = Route {
    name: "createDataset",
    method: HttpMethod::Post,
    path: || "/datasets".to_string(),
};

pub const LIST_DATASETS: Route<Path0> = Route {
    name: "listDatasets",
    method: HttpMethod::Get,
    path: || "/datasets".to_string(),
};

pub const DELETE_DATASET: Route<Path1> = Route {
    name: "deleteDataset",
    method: HttpMethod::Delete,
    path: |dataset_id: &str| format!("/datasets/{dataset_id}"),
};

pub const CREATE_DOCUMENT_BY_TEXT: Route<Path1> = Route {
    name: "createDocumentByText",
    method: HttpMethod::Post,
    path: |dataset_id: &str| format!("/datasets/{dataset_id}/document/create_by_text"),
};

pub const UPDATE_DOCUMENT_BY_TEXT: Route<Path2> = Route {
    name: "updateDocumentByText",
    method: HttpMethod::Post,
    path: |dataset_id: &str, document_id: &str| {
        format!("/datasets/{dataset_id}/documents/{document_id}/update_by_text")
    },
};

pub const CREATE_DOCUMENT_BY_FILE: Route<Path1> = Route {
    name: "createDocumentByFile",
    method: HttpMethod::Post,
    path: |dataset_id: &str| format!("/datasets/{dataset_id}/document/create_by_file"),
};

pub const UPDATE_DOCUMENT_BY_FILE: Route<Path2> = Route {
    name: "updateDocumentByFile",
    method: HttpMethod::Post,
    path: |dataset_id: &str, document_id: &str| {
        format!("/datasets/{dataset_id}/documents/{document_id}/update_by_file")
    },
};

pub const LIST_DOCUMENTS: Route<Path1> = Route {
    name: "listDocuments",
    method: HttpMethod::Get,
    path: |dataset_id: &str| format!("/datasets/{dataset_id}/documents"),
};

pub const DELETE_DOCUMENT: Route<Path2> = Route {
    name: "deleteDocument",
    method: HttpMethod::Delete,
    path: |dataset_id: &str, document_id: &str| {
        format!("/datasets/{dataset_id}/documents/{document_id}")
    },
};

pub const GET_INDEXING_STATUS: Route<Path2> = Route {
    name: "getIndexingStatus",
    method: HttpMethod::Get,
    path: |dataset_id: &str, batch: &str| {
        format!("/datasets/{dataset_id}/documents/{batch}/indexing-status")
    },
};

pub const ADD_SEGMENTS: Route<Path2> = Route {
    name: "addSegments",
    method: HttpMethod::Post,
    path: |dataset_id: &str, document_id: &str| {
        format!("/datasets/{dataset_id}/documents/{document_id}/segments")
    },
};

pub const QUERY_SEGMENTS: Route<Path2> = Route {
    name: "querySegments",
    method: HttpMethod::Get,
    path: |dataset_id: &str, document_id: &str| {
        format!("/datasets/{dataset_id}/documents/{document_id}/segments")
    },
};

pub const UPDATE_SEGMENT: Route<Path3> = Route {
    name: "updateSegment",
    method: HttpMethod::Post,
    path: |dataset_id: &str, document_id: &str, segment_id: &str| {
        format!("/datasets/{dataset_id}/documents/{document_id}/segments/{segment_id}")
    },
};

pub const DELETE_SEGMENT: Route<Path3> = Route {
    name: "deleteSegment",
    method: HttpMethod::Delete,
    path: |dataset_id: &str, document_id: &str, segment_id: &str| {
        format!("/datasets/{dataset_id}/documents/{document_id}/segments/{segment_id}")
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.dify.ai/v1";

    fn url(path: String) -> String {
        format!("{BASE}{path}")
    }

    #[test]
    fn application_routes() {
        assert_eq!(
            url(FEEDBACK.resolve("msg-1")),
            "https://api.dify.ai/v1/messages/msg-1/feedbacks"
        );
        assert_eq!(url(APPLICATION.resolve()), "https://api.dify.ai/v1/parameters");
        assert_eq!(url(FILE_UPLOAD.resolve()), "https://api.dify.ai/v1/files/upload");
        assert_eq!(url(TEXT_TO_AUDIO.resolve()), "https://api.dify.ai/v1/text-to-audio");
        assert_eq!(url(GET_META.resolve()), "https://api.dify.ai/v1/meta");
        assert_eq!(url(GET_INFO.resolve()), "https://api.dify.ai/v1/info");
        assert_eq!(FEEDBACK.method, HttpMethod::Post);
        assert_eq!(APPLICATION.method, HttpMethod::Get);
        assert_eq!(GET_META.method, HttpMethod::Get);
    }

    #[test]
    fn chat_and_completion_routes() {
        assert_eq!(CREATE_COMPLETION_MESSAGE.resolve(), "/completion-messages");
        assert_eq!(CREATE_CHAT_MESSAGE.resolve(), "/chat-messages");
        assert_eq!(GET_SUGGESTED.resolve("m1"), "/messages/m1/suggested");
        assert_eq!(STOP_CHAT_MESSAGE.resolve("t1"), "/chat-messages/t1/stop");
        assert_eq!(GET_CONVERSATIONS.resolve(), "/conversations");
        assert_eq!(GET_CONVERSATION_MESSAGES.resolve(), "/messages");
        assert_eq!(RENAME_CONVERSATION.resolve("c1"), "/conversations/c1/name");
        assert_eq!(DELETE_CONVERSATION.resolve("c1"), "/conversations/c1");
        assert_eq!(DELETE_CONVERSATION.method, HttpMethod::Delete);
        assert_eq!(AUDIO_TO_TEXT.resolve(), "/audio-to-text");
    }

    #[test]
    fn workflow_routes() {
        assert_eq!(RUN_WORKFLOW.resolve(), "/workflows/run");
        assert_eq!(STOP_WORKFLOW.resolve("task-9"), "/workflows/task-9/stop");
        assert_eq!(GET_WORKFLOW_RUN.resolve("run-3"), "/workflows/run/run-3");
    }

    #[test]
    fn dataset_routes() {
        assert_eq!(CREATE_DATASET.resolve(), "/datasets");
        assert_eq!(LIST_DATASETS.method, HttpMethod::Get);
        assert_eq!(DELETE_DATASET.resolve("d"), "/datasets/d");
        assert_eq!(
            CREATE_DOCUMENT_BY_TEXT.resolve("d"),
            "/datasets/d/document/create_by_text"
        );
        assert_eq!(
            UPDATE_DOCUMENT_BY_TEXT.resolve("d", "doc"),
            "/datasets/d/documents/doc/update_by_text"
        );
        assert_eq!(
            CREATE_DOCUMENT_BY_FILE.resolve("d"),
            "/datasets/d/document/create_by_file"
        );
        assert_eq!(
            UPDATE_DOCUMENT_BY_FILE.resolve("d", "doc"),
            "/datasets/d/documents/doc/update_by_file"
        );
        assert_eq!(LIST_DOCUMENTS.resolve("d"), "/datasets/d/documents");
        assert_eq!(DELETE_DOCUMENT.resolve("d", "doc"), "/datasets/d/documents/doc");
        assert_eq!(
            GET_INDEXING_STATUS.resolve("d", "batch-1"),
            "/datasets/d/documents/batch-1/indexing-status"
        );
        assert_eq!(
            ADD_SEGMENTS.resolve("d", "doc"),
            "/datasets/d/documents/doc/segments"
        );
        assert_eq!(QUERY_SEGMENTS.method, HttpMethod::Get);
        assert_eq!(
            UPDATE_SEGMENT.resolve("d", "doc", "s"),
            "/datasets/d/documents/doc/segments/s"
        );
        assert_eq!(DELETE_SEGMENT.method, HttpMethod::Delete);
    }

    #[test]
    fn parameters_are_not_escaped() {
        assert_eq!(
            DELETE_CONVERSATION.resolve("a b/c?d"),
            "/conversations/a b/c?d"
        );
    }

    #[test]
    fn read_verbs() {
        assert!(HttpMethod::Get.is_read());
        assert!(HttpMethod::Head.is_read());
        assert!(!HttpMethod::Delete.is_read());
        assert_eq!(reqwest::Method::from(HttpMethod::Patch), reqwest::Method::PATCH);
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }
}
