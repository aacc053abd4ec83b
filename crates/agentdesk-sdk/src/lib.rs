//! # AgentDesk SDK
//!
//! Client-side building blocks for talking to the AgentDesk backend.
//!
//! The SDK provides:
//!
//! * [`AgentDeskClient`] — typed gateway with one async method per REST
//!   operation (user state, world state, agent chat / complete / health).
//! * [`config`] — one-time, process-wide base-URL resolution
//!   ([`api_base`], [`ApiConfig`], [`ApiBase`]).
//! * [`session`] — the chat-session controller ([`ChatSession`]) and its
//!   optimistic-append / error-recovery contract, shared by every front end.
//! * [`SdkError`] — unified error type for all SDK operations.
//!
//! Model types from [`agentdesk_models`] are re-exported for convenience.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use agentdesk_sdk::{send_message, AgentDeskClient, ChatSession};
//!
//! # async fn run() {
//! let client = AgentDeskClient::from_env();
//! let mut session = ChatSession::default();
//! session.set_draft("hello");
//! send_message(&mut session, &client, "error: backend unreachable").await;
//! for entry in session.transcript() {
//!     println!("{}: {}", entry.role, entry.content);
//! }
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod session;

pub use client::AgentDeskClient;
pub use config::{api_base, ApiBase, ApiConfig, BuildMode};
pub use error::SdkError;
pub use session::{
    create_user_state, create_world_state, send_message, ChatSession, RecordKind, RecordNotice,
    SendOutcome, SessionBackend,
};

// Re-export model types for ergonomic usage.
pub use agentdesk_models::{
    AgentChatRequest, AgentCompleteRequest, AgentHealth, AgentResponse, Role, SessionId,
    Transcript, TranscriptEntry, UserId, UserState, WorldKey, WorldState,
};
