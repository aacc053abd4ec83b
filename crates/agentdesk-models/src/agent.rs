//! Agent request / response bodies.

use serde::{Deserialize, Serialize};

use crate::identity::{SessionId, UserId};

/// Body of `POST /agent/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentChatRequest {
    /// Conversation the message belongs to.
    pub session_id: SessionId,
    /// The user's (trimmed) message.
    pub message: String,
    /// Lets the agent look up the user's state records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Body of `POST /agent/complete` (single prompt, no conversational memory).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentCompleteRequest {
    /// Session to attribute the completion to.
    pub session_id: SessionId,
    /// Prompt text.
    pub prompt: String,
    /// Optional user for state lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Reply to both chat and complete calls.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentResponse {
    /// Text produced by the agent.
    pub response: String,
    /// Session the reply belongs to (may be server-generated).
    pub session_id: SessionId,
}

/// Reply of `GET /agent/health`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentHealth {
    /// `"healthy"` when the agent is up.
    pub status: String,
    /// Name of the reporting service.
    pub service: String,
}
