use agentdesk_sdk::{
    AgentChatRequest, AgentResponse, ChatSession, RecordNotice, SdkError, SendOutcome,
    TranscriptEntry,
};
use tracing::{debug, info};

// ── Transcript rendering ─────────────────────────────────────────────

/// One row of the transcript area, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptRow {
    Entry(TranscriptEntry),
    /// "Agent is responding" indicator, always after the last entry.
    Responding,
    /// Shown instead of entries when nothing has been said yet.
    Placeholder,
}

// ── Top-level app state ──────────────────────────────────────────────

/// Everything the chat window renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub session: ChatSession,
    /// Record-creation acknowledgement waiting to be dismissed.
    pub notice: Option<RecordNotice>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a send from the composer. `None` means nothing to dispatch.
    pub fn begin_send(&mut self) -> Option<AgentChatRequest> {
        let request = self.session.begin_send();
        match &request {
            Some(req) => debug!(session_id = %req.session_id, "chat request dispatched"),
            None => debug!(pending = self.session.is_pending(), "send skipped"),
        }
        request
    }

    pub fn complete_send(
        &mut self,
        outcome: Result<AgentResponse, SdkError>,
        error_text: &str,
    ) -> SendOutcome {
        self.session.complete_send(outcome, error_text)
    }

    /// Show `notice`, replacing any notice still on screen.
    pub fn show_notice(&mut self, notice: RecordNotice) {
        info!(kind = ?notice.kind, created = notice.created, "record notice shown");
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Rows of the transcript area in display order.
    pub fn transcript_rows(&self) -> Vec<TranscriptRow> {
        let pending = self.session.is_pending();
        let transcript = self.session.transcript();
        if transcript.is_empty() && !pending {
            return vec![TranscriptRow::Placeholder];
        }
        let mut rows: Vec<TranscriptRow> = transcript
            .iter()
            .cloned()
            .map(TranscriptRow::Entry)
            .collect();
        if pending {
            rows.push(TranscriptRow::Responding);
        }
        rows
    }

    /// The message input accepts no edits while a reply is pending.
    pub fn composer_disabled(&self) -> bool {
        self.session.is_pending()
    }

    /// The send button is off while pending or while the draft is blank.
    pub fn send_disabled(&self) -> bool {
        !self.session.can_send()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdesk_sdk::{
        create_user_state, create_world_state, AgentDeskClient, ApiBase, RecordKind, Role,
    };

    const ERROR_TEXT: &str = "錯誤：無法連接到後端服務。";

    async fn live_client() -> AgentDeskClient {
        let addr = mock_backend::spawn_ephemeral().await.expect("bind");
        AgentDeskClient::new(ApiBase::direct(&format!("http://{addr}")))
    }

    #[test]
    fn notice_lifecycle() {
        let mut state = AppState::new();
        assert_eq!(state.notice, None);

        state.show_notice(RecordNotice {
            kind: RecordKind::UserState,
            created: true,
        });
        assert!(state.notice.is_some());

        state.dismiss_notice();
        assert_eq!(state.notice, None);
    }

    #[test]
    fn empty_transcript_shows_placeholder() {
        let state = AppState::new();
        assert_eq!(state.transcript_rows(), vec![TranscriptRow::Placeholder]);
        assert!(!state.composer_disabled());
        assert!(state.send_disabled());
    }

    #[test]
    fn pending_send_renders_indicator_last_and_disables_composer() {
        let mut state = AppState::new();
        state.session.set_draft("hi");
        assert!(!state.send_disabled());

        state.begin_send().expect("request");

        assert_eq!(
            state.transcript_rows(),
            vec![
                TranscriptRow::Entry(TranscriptEntry::user("hi")),
                TranscriptRow::Responding,
            ]
        );
        assert!(state.composer_disabled());
        state.session.set_draft("more");
        assert!(state.send_disabled());
    }

    #[test]
    fn indicator_disappears_once_the_reply_lands() {
        let mut state = AppState::new();
        state.session.set_draft("hi");
        state.begin_send().expect("request");

        let reply = AgentResponse {
            response: "hello".into(),
            session_id: state.session.session_id().clone(),
        };
        state.complete_send(Ok(reply), ERROR_TEXT);

        assert_eq!(
            state.transcript_rows(),
            vec![
                TranscriptRow::Entry(TranscriptEntry::user("hi")),
                TranscriptRow::Entry(TranscriptEntry::agent("hello")),
            ]
        );
        assert!(!state.composer_disabled());
    }

    #[test]
    fn blank_draft_dispatches_nothing() {
        let mut state = AppState::new();
        state.session.set_draft("   ");
        assert!(state.begin_send().is_none());
        assert!(state.session.transcript().is_empty());
    }

    #[tokio::test]
    async fn two_phase_send_against_live_backend() {
        let client = live_client().await;
        let mut state = AppState::new();
        state.session.set_draft("hello");

        let request = state.begin_send().expect("request");
        assert!(state.session.is_pending());
        assert_eq!(state.session.draft(), "");

        // A second press while pending is a no-op.
        state.session.set_draft("again");
        assert!(state.begin_send().is_none());

        let outcome = client.chat(&request).await;
        assert_eq!(state.complete_send(outcome, ERROR_TEXT), SendOutcome::Replied);

        let entries = state.session.transcript().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[1].role, Role::Agent);
        assert!(entries[1].content.starts_with("Agent received: hello"));
        assert!(!state.session.is_pending());
    }

    #[tokio::test]
    async fn unreachable_backend_appends_error_entry() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        let client = AgentDeskClient::new(ApiBase::direct(&format!("http://{addr}")));

        let mut state = AppState::new();
        state.session.set_draft("ping");
        let request = state.begin_send().expect("request");
        let outcome = client.chat(&request).await;

        assert_eq!(state.complete_send(outcome, ERROR_TEXT), SendOutcome::Failed);
        let last = state.session.transcript().last().expect("entry");
        assert_eq!(last.role, Role::Agent);
        assert_eq!(last.content, ERROR_TEXT);
        assert!(!state.session.is_pending());
    }

    #[tokio::test]
    async fn record_notices_from_live_backend() {
        let client = live_client().await;
        let mut state = AppState::new();

        let notice = create_user_state(&client, state.session.user_id().clone()).await;
        assert!(notice.created);
        state.show_notice(notice);
        assert_eq!(state.notice.map(|n| n.kind), Some(RecordKind::UserState));

        assert!(create_world_state(&client).await.created);
        // The example key is fixed, so a second attempt conflicts.
        let again = create_world_state(&client).await;
        assert_eq!(again.kind, RecordKind::WorldState);
        assert!(!again.created);

        // Creation never touches the transcript.
        assert!(state.session.transcript().is_empty());
    }
}
