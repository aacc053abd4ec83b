use agentdesk_sdk::{AgentDeskClient, Role, SendOutcome};
use dioxus::prelude::*;
use tracing::debug;

use crate::i18n::{t, use_locale};
use crate::state::{AppState, TranscriptRow};

/// Whether `key` submits the composer.
pub fn is_send_key(key: &Key) -> bool {
    *key == Key::Enter
}

/// Start a send from the composer and finish it once the agent answers.
///
/// The request is built synchronously so the user entry and the pending
/// indicator render before the network call starts.
fn dispatch_send(
    mut app_state: Signal<AppState>,
    client: AgentDeskClient,
    error_text: &'static str,
) {
    let Some(request) = app_state.write().begin_send() else {
        return;
    };
    spawn(async move {
        let outcome = client.chat(&request).await;
        let result = app_state.write().complete_send(outcome, error_text);
        if result == SendOutcome::Failed {
            debug!("error entry appended to transcript");
        }
    });
}

/// Transcript plus message composer.
#[component]
pub fn ChatPanel(app_state: Signal<AppState>) -> Element {
    let locale = use_locale();
    let tr = t(*locale.read());
    let client = use_context::<AgentDeskClient>();

    let state = app_state.read();
    let rows = state.transcript_rows();
    let composer_disabled = state.composer_disabled();
    let send_disabled = state.send_disabled();
    let draft = state.session.draft().to_string();
    drop(state);

    let error_text = tr.chat_error;

    rsx! {
        div { class: "chat-panel",
            h2 { class: "panel-title", "{tr.chat_title}" }

            div { class: "transcript",
                for (idx, row) in rows.into_iter().enumerate() {
                    {match row {
                        TranscriptRow::Placeholder => rsx! {
                            p { key: "{idx}", class: "empty-state", "{tr.empty_transcript}" }
                        },
                        TranscriptRow::Responding => rsx! {
                            div {
                                key: "{idx}",
                                class: "bubble agent typing",
                                title: "{tr.responding}",
                                span { class: "dot" }
                                span { class: "dot" }
                                span { class: "dot" }
                            }
                        },
                        TranscriptRow::Entry(entry) => rsx! {
                            div {
                                key: "{idx}",
                                class: match entry.role {
                                    Role::User => "bubble user",
                                    Role::Agent => "bubble agent",
                                },
                                span { class: "bubble-author",
                                    {match entry.role {
                                        Role::User => tr.you,
                                        Role::Agent => tr.agent,
                                    }}
                                }
                                p { class: "bubble-text", "{entry.content}" }
                            }
                        },
                    }}
                }
            }

            div { class: "composer",
                input {
                    r#type: "text",
                    class: "composer-input",
                    placeholder: "{tr.input_placeholder}",
                    value: "{draft}",
                    disabled: composer_disabled,
                    oninput: move |evt: Event<FormData>| {
                        app_state.write().session.set_draft(evt.value());
                    },
                    onkeydown: {
                        let client = client.clone();
                        move |evt: Event<KeyboardData>| {
                            if is_send_key(&evt.key()) {
                                dispatch_send(app_state, client.clone(), error_text);
                            }
                        }
                    },
                }
                button {
                    class: "send-btn",
                    disabled: send_disabled,
                    onclick: move |_| dispatch_send(app_state, client.clone(), error_text),
                    "{tr.send}"
                }
            }
        }
    }
}
