//! Chat-session controller shared by the GUI and the CLI.
//!
//! [`ChatSession`] owns the ephemeral view state of one conversation (draft,
//! identifiers, transcript, pending flag) and implements the send contract
//! as two explicit phases:
//!
//! 1. [`ChatSession::begin_send`] — validate the draft, clear it, append the
//!    user entry, raise the pending flag and hand back the request to
//!    dispatch;
//! 2. [`ChatSession::complete_send`] — append the agent reply (or the
//!    localized error text) and lower the pending flag.
//!
//! UI frameworks that cannot hold `&mut` state across an `.await` call the
//! two phases around their own dispatch; everyone else can use
//! [`send_message`].
//!
//! Record creation is deliberately kept off the transcript: its outcome is
//! reported as a [`RecordNotice`] for a separate, blocking acknowledgment.

use std::future::Future;

use agentdesk_models::{
    AgentChatRequest, AgentResponse, OutgoingMessage, SessionId, Transcript, TranscriptEntry,
    UserId, UserState, UserStateCreate, WorldState, WorldStateCreate,
};
use chrono::Utc;
use tracing::{debug, warn};

use crate::client::AgentDeskClient;
use crate::error::SdkError;

/// Session id a fresh session starts with.
pub const DEFAULT_SESSION_ID: &str = "default-session";
/// User id a fresh session starts with.
pub const DEFAULT_USER_ID: &str = "default-user";

// ---------------------------------------------------------------------------
// SessionBackend
// ---------------------------------------------------------------------------

/// The slice of the gateway a chat session needs.
///
/// Implemented by [`AgentDeskClient`]; tests substitute scripted backends.
pub trait SessionBackend {
    /// Dispatch one chat turn.
    fn send_chat(
        &self,
        request: AgentChatRequest,
    ) -> impl Future<Output = Result<AgentResponse, SdkError>>;

    /// Create a user-state record.
    fn create_user_record(
        &self,
        body: UserStateCreate,
    ) -> impl Future<Output = Result<UserState, SdkError>>;

    /// Create a world-state record.
    fn create_world_record(
        &self,
        body: WorldStateCreate,
    ) -> impl Future<Output = Result<WorldState, SdkError>>;
}

impl SessionBackend for AgentDeskClient {
    async fn send_chat(&self, request: AgentChatRequest) -> Result<AgentResponse, SdkError> {
        self.chat(&request).await
    }

    async fn create_user_record(&self, body: UserStateCreate) -> Result<UserState, SdkError> {
        self.create_user(&body).await
    }

    async fn create_world_record(&self, body: WorldStateCreate) -> Result<WorldState, SdkError> {
        self.create_world(&body).await
    }
}

// ---------------------------------------------------------------------------
// ChatSession
// ---------------------------------------------------------------------------

/// Outcome of a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank draft or a request already pending: nothing happened.
    Skipped,
    /// The agent answered; its reply was appended.
    Replied,
    /// The call failed; the error text was appended instead.
    Failed,
}

/// View state of one chat conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    draft: String,
    session_id: SessionId,
    user_id: UserId,
    transcript: Transcript,
    pending: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(SessionId::new(DEFAULT_SESSION_ID), UserId::new(DEFAULT_USER_ID))
    }
}

impl ChatSession {
    /// Fresh session with the given identifiers and an empty transcript.
    pub fn new(session_id: SessionId, user_id: UserId) -> Self {
        Self {
            draft: String::new(),
            session_id,
            user_id,
            transcript: Transcript::new(),
            pending: false,
        }
    }

    // ------------------------------------------------------------------
    // User edits
    // ------------------------------------------------------------------

    /// Replace the draft message text.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Replace the session id.
    pub fn set_session_id(&mut self, session_id: SessionId) {
        self.session_id = session_id;
    }

    /// Replace the user id.
    pub fn set_user_id(&mut self, user_id: UserId) {
        self.user_id = user_id;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// `true` while a chat request is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether a send would do anything right now.
    pub fn can_send(&self) -> bool {
        !self.pending && !self.draft.trim().is_empty()
    }

    // ------------------------------------------------------------------
    // Send contract
    // ------------------------------------------------------------------

    /// First phase of a send.
    ///
    /// Returns `None` (and changes nothing) when the trimmed draft is empty
    /// or a request is already pending. Otherwise clears the draft, appends
    /// the user entry, sets the pending flag and returns the request the
    /// caller must dispatch.
    pub fn begin_send(&mut self) -> Option<AgentChatRequest> {
        if self.pending {
            debug!("send ignored: a chat request is already pending");
            return None;
        }
        let message = OutgoingMessage::parse(&self.draft).ok()?;

        self.draft.clear();
        self.transcript.push(TranscriptEntry::user(message.as_str()));
        self.pending = true;

        Some(AgentChatRequest {
            session_id: self.session_id.clone(),
            message: message.into_inner(),
            user_id: (!self.user_id.is_blank()).then(|| self.user_id.clone()),
        })
    }

    /// Second phase of a send.
    ///
    /// Appends the agent reply, or `error_text` when the call failed, then
    /// clears the pending flag. The failure itself is only traced. Calling
    /// this with no request pending is ignored.
    pub fn complete_send(
        &mut self,
        outcome: Result<AgentResponse, SdkError>,
        error_text: &str,
    ) -> SendOutcome {
        if !self.pending {
            warn!("chat completion observed with no request pending");
            return SendOutcome::Skipped;
        }

        let result = match outcome {
            Ok(reply) => {
                self.transcript.push(TranscriptEntry::agent(reply.response));
                SendOutcome::Replied
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                self.transcript.push(TranscriptEntry::agent(error_text));
                SendOutcome::Failed
            }
        };
        self.pending = false;
        result
    }
}

/// Run both send phases against `backend`.
pub async fn send_message<B: SessionBackend>(
    session: &mut ChatSession,
    backend: &B,
    error_text: &str,
) -> SendOutcome {
    let Some(request) = session.begin_send() else {
        return SendOutcome::Skipped;
    };
    let outcome = backend.send_chat(request).await;
    session.complete_send(outcome, error_text)
}

// ---------------------------------------------------------------------------
// Record creation
// ---------------------------------------------------------------------------

/// Which record store a create call targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `POST /users`
    UserState,
    /// `POST /world`
    WorldState,
}

/// One-shot acknowledgment of a create call, shown outside the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordNotice {
    /// Store the call targeted.
    pub kind: RecordKind,
    /// `true` if the backend accepted the record.
    pub created: bool,
}

/// Create the example user-state record for `user_id`, stamped with the
/// current time.
pub async fn create_user_state<B: SessionBackend>(backend: &B, user_id: UserId) -> RecordNotice {
    let body = UserStateCreate::stamped(user_id, Utc::now());
    let created = match backend.create_user_record(body).await {
        Ok(record) => {
            debug!(id = %record.id, "user state created");
            true
        }
        Err(e) => {
            warn!(error = %e, "creating user state failed");
            false
        }
    };
    RecordNotice {
        kind: RecordKind::UserState,
        created,
    }
}

/// Create the example world-state record, stamped with the current time.
pub async fn create_world_state<B: SessionBackend>(backend: &B) -> RecordNotice {
    let body = WorldStateCreate::example(Utc::now());
    let created = match backend.create_world_record(body).await {
        Ok(record) => {
            debug!(id = %record.id, "world state created");
            true
        }
        Err(e) => {
            warn!(error = %e, "creating world state failed");
            false
        }
    };
    RecordNotice {
        kind: RecordKind::WorldState,
        created,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use agentdesk_models::{Role, WorldKey, EXAMPLE_WORLD_KEY};
    use reqwest::StatusCode;

    use super::*;
    use crate::config::ApiBase;

    const ERROR_TEXT: &str = "error: cannot reach the backend";

    /// Backend answering from a script and recording what it was sent.
    #[derive(Default)]
    struct ScriptedBackend {
        fail: bool,
        chats: RefCell<Vec<AgentChatRequest>>,
        users: RefCell<Vec<UserStateCreate>>,
        worlds: RefCell<Vec<WorldStateCreate>>,
        calls: Cell<usize>,
    }

    impl ScriptedBackend {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn status_error() -> SdkError {
            SdkError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".into(),
            }
        }
    }

    impl SessionBackend for ScriptedBackend {
        async fn send_chat(&self, request: AgentChatRequest) -> Result<AgentResponse, SdkError> {
            self.calls.set(self.calls.get() + 1);
            let session_id = request.session_id.clone();
            self.chats.borrow_mut().push(request);
            if self.fail {
                return Err(Self::status_error());
            }
            Ok(AgentResponse {
                response: "hello".into(),
                session_id,
            })
        }

        async fn create_user_record(&self, body: UserStateCreate) -> Result<UserState, SdkError> {
            self.calls.set(self.calls.get() + 1);
            self.users.borrow_mut().push(body.clone());
            if self.fail {
                return Err(Self::status_error());
            }
            Ok(UserState {
                id: "1".into(),
                user_id: body.user_id,
                data: body.data,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        }

        async fn create_world_record(
            &self,
            body: WorldStateCreate,
        ) -> Result<WorldState, SdkError> {
            self.calls.set(self.calls.get() + 1);
            self.worlds.borrow_mut().push(body.clone());
            if self.fail {
                return Err(Self::status_error());
            }
            Ok(WorldState {
                id: "1".into(),
                key: body.key,
                data: body.data,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        }
    }

    fn session(draft: &str) -> ChatSession {
        let mut s = ChatSession::new(SessionId::new("s1"), UserId::new("u1"));
        s.set_draft(draft);
        s
    }

    #[test]
    fn defaults() {
        let s = ChatSession::default();
        assert_eq!(s.session_id().as_str(), DEFAULT_SESSION_ID);
        assert_eq!(s.user_id().as_str(), DEFAULT_USER_ID);
        assert!(s.transcript().is_empty());
        assert!(!s.is_pending());
        assert!(!s.can_send());
    }

    #[test]
    fn begin_send_appends_user_entry_before_pending() {
        let mut s = session("  hi  ");
        let req = s.begin_send().expect("request");

        assert_eq!(s.draft(), "");
        assert!(s.is_pending());
        assert_eq!(s.transcript().entries(), &[TranscriptEntry::user("hi")]);
        assert_eq!(
            req,
            AgentChatRequest {
                session_id: SessionId::new("s1"),
                message: "hi".into(),
                user_id: Some(UserId::new("u1")),
            }
        );
    }

    #[test]
    fn blank_draft_is_a_no_op() {
        for draft in ["", "   ", "\n\t "] {
            let mut s = session(draft);
            assert!(s.begin_send().is_none());
            assert!(s.transcript().is_empty());
            assert!(!s.is_pending());
            assert_eq!(s.draft(), draft);
        }
    }

    #[test]
    fn second_send_while_pending_is_ignored() {
        let mut s = session("first");
        s.begin_send().expect("first request");
        s.set_draft("second");
        assert!(!s.can_send());
        assert!(s.begin_send().is_none());
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.draft(), "second");
    }

    #[test]
    fn complete_without_pending_is_ignored() {
        let mut s = session("");
        let outcome = s.complete_send(
            Ok(AgentResponse {
                response: "late".into(),
                session_id: SessionId::new("s1"),
            }),
            ERROR_TEXT,
        );
        assert_eq!(outcome, SendOutcome::Skipped);
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn blank_user_id_is_omitted() {
        let mut s = ChatSession::new(SessionId::new("s1"), UserId::new(" "));
        s.set_draft("hi");
        assert_eq!(s.begin_send().expect("request").user_id, None);
    }

    #[tokio::test]
    async fn successful_send_appends_reply() {
        let backend = ScriptedBackend::default();
        let mut s = session("hi");

        let outcome = send_message(&mut s, &backend, ERROR_TEXT).await;

        assert_eq!(outcome, SendOutcome::Replied);
        assert!(!s.is_pending());
        assert_eq!(
            s.transcript().entries(),
            &[TranscriptEntry::user("hi"), TranscriptEntry::agent("hello")]
        );
        assert_eq!(backend.chats.borrow().len(), 1);
    }

    #[tokio::test]
    async fn failed_send_appends_error_text() {
        let backend = ScriptedBackend::failing();
        let mut s = session("hi");

        let outcome = send_message(&mut s, &backend, ERROR_TEXT).await;

        assert_eq!(outcome, SendOutcome::Failed);
        assert!(!s.is_pending());
        assert_eq!(
            s.transcript().entries(),
            &[TranscriptEntry::user("hi"), TranscriptEntry::agent(ERROR_TEXT)]
        );
    }

    #[tokio::test]
    async fn blank_send_dispatches_nothing() {
        let backend = ScriptedBackend::default();
        let mut s = session("   ");
        assert_eq!(
            send_message(&mut s, &backend, ERROR_TEXT).await,
            SendOutcome::Skipped
        );
        assert_eq!(backend.calls.get(), 0);
    }

    #[tokio::test]
    async fn every_send_adds_exactly_two_entries() {
        let backend = ScriptedBackend::default();
        let mut s = session("");
        for (i, draft) in ["a", " b ", "c d"].iter().enumerate() {
            s.set_draft(*draft);
            send_message(&mut s, &backend, ERROR_TEXT).await;
            assert_eq!(s.transcript().len(), (i + 1) * 2);
        }
        let roles: Vec<Role> = s.transcript().iter().map(|e| e.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Agent, Role::User, Role::Agent, Role::User, Role::Agent]
        );
        assert_eq!(s.transcript().entries()[2].content, "b");
    }

    #[tokio::test]
    async fn user_state_notice_does_not_touch_transcript() {
        let backend = ScriptedBackend::default();
        let s = session("draft");

        let notice = create_user_state(&backend, s.user_id().clone()).await;

        assert_eq!(
            notice,
            RecordNotice {
                kind: RecordKind::UserState,
                created: true
            }
        );
        let sent = backend.users.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, UserId::new("u1"));
        assert!(sent[0].data["created_at"]
            .as_str()
            .is_some_and(|ts| ts.ends_with('Z')));
        assert!(s.transcript().is_empty());
        assert_eq!(s.draft(), "draft");
    }

    #[tokio::test]
    async fn failed_creates_report_failure() {
        let backend = ScriptedBackend::failing();
        let user = create_user_state(&backend, UserId::new("u1")).await;
        let world = create_world_state(&backend).await;
        assert!(!user.created);
        assert!(!world.created);
        assert_eq!(world.kind, RecordKind::WorldState);
        assert_eq!(backend.worlds.borrow()[0].key, WorldKey::new(EXAMPLE_WORLD_KEY));
    }

    #[tokio::test]
    async fn session_against_mock_backend() {
        let addr = mock_backend::spawn_ephemeral().await.expect("bind");
        let client = AgentDeskClient::new(ApiBase::direct(&format!("http://{addr}")));
        let mut s = session("hi");

        assert_eq!(
            send_message(&mut s, &client, ERROR_TEXT).await,
            SendOutcome::Replied
        );
        assert_eq!(
            s.transcript().last(),
            Some(&TranscriptEntry::agent("Agent received: hi"))
        );

        let notice = create_user_state(&client, s.user_id().clone()).await;
        assert!(notice.created);
        let notice = create_user_state(&client, s.user_id().clone()).await;
        assert!(!notice.created, "duplicate user state is rejected");
        assert_eq!(s.transcript().len(), 2);
    }

    #[tokio::test]
    async fn session_against_unreachable_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = AgentDeskClient::new(ApiBase::direct(&format!("http://{addr}")));
        let mut s = session("hi");

        assert_eq!(
            send_message(&mut s, &client, ERROR_TEXT).await,
            SendOutcome::Failed
        );
        assert!(!s.is_pending());
        assert_eq!(
            s.transcript().entries(),
            &[TranscriptEntry::user("hi"), TranscriptEntry::agent(ERROR_TEXT)]
        );
    }
}
