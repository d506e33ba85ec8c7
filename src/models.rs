//! Transcript and wire payload types.

use serde::{Deserialize, Serialize};

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the conversation transcript.
///
/// The history is append-only for the life of a conversation and cleared in
/// full on reset. Only the most recent user message is transmitted per
/// request; the remote service keeps its own conversation-side history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One entry of the organization list response.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationSummary {
    /// UUID-shaped organization identifier.
    pub uuid: String,
}

/// Request body for conversation creation.
///
/// The client generates the identifier; the backend adopts it as canonical.
#[derive(Debug, Clone, Serialize)]
pub struct NewConversation {
    pub uuid: String,
    pub name: String,
}

/// Response body of conversation creation.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationCreated {
    pub uuid: String,
}

/// Request body for the streaming completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub timezone: String,
    pub attachments: Vec<serde_json::Value>,
    pub files: Vec<serde_json::Value>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            timezone: timezone.into(),
            attachments: Vec::new(),
            files: Vec::new(),
        }
    }
}
