//! Interactive chat loop.
//!
//! Each input line is a draft; blank lines are ignored and `/quit` leaves.
//! The pending indicator is printed between the two send phases, so it is
//! visible for exactly as long as the request is in flight.

use std::io::Write;

use agentdesk_models::{Role, TranscriptEntry};
use agentdesk_sdk::{ChatSession, SessionBackend};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Shown in place of the agent's reply when a chat call fails.
///
/// The terminal front end is English only; [`run`] takes the text as a
/// parameter so another locale can be passed in.
pub const CHAT_ERROR_TEXT: &str = "Error: unable to reach the backend service.";

const QUIT_COMMAND: &str = "/quit";

fn write_entry(out: &mut impl Write, entry: &TranscriptEntry) -> std::io::Result<()> {
    let label = match entry.role {
        Role::User => "you",
        Role::Agent => "agent",
    };
    writeln!(out, "{label}> {}", entry.content)
}

/// Drive `session` from `input` until EOF or `/quit`.
pub async fn run<B, R, W>(
    backend: &B,
    mut session: ChatSession,
    input: R,
    out: &mut W,
    error_text: &str,
) -> anyhow::Result<()>
where
    B: SessionBackend,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(
        out,
        "session {} as {} (type {QUIT_COMMAND} to leave)",
        session.session_id(),
        session.user_id()
    )?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == QUIT_COMMAND {
            break;
        }

        session.set_draft(line);
        let Some(request) = session.begin_send() else {
            continue;
        };
        if let Some(entry) = session.transcript().last() {
            write_entry(out, entry)?;
        }
        writeln!(out, "agent is responding…")?;
        out.flush()?;

        let outcome = backend.send_chat(request).await;
        session.complete_send(outcome, error_text);
        if let Some(entry) = session.transcript().last() {
            write_entry(out, entry)?;
        }
    }

    tracing::debug!(turns = session.transcript().len(), "chat loop finished");
    Ok(())
}
