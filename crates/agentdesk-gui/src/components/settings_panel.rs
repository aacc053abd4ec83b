use agentdesk_sdk::{create_user_state, create_world_state, AgentDeskClient, SessionId, UserId};
use dioxus::prelude::*;

use crate::i18n::{t, use_locale};
use crate::state::AppState;

/// Session and user identifier inputs plus the example-record buttons.
#[component]
pub fn SettingsPanel(app_state: Signal<AppState>) -> Element {
    let locale = use_locale();
    let tr = t(*locale.read());
    let client = use_context::<AgentDeskClient>();

    let state = app_state.read();
    let session_id = state.session.session_id().to_string();
    let user_id = state.session.user_id().to_string();
    drop(state);

    rsx! {
        div { class: "settings-panel",
            h2 { class: "panel-title", "{tr.settings_title}" }

            div { class: "form-row",
                label { "{tr.session_id_label}" }
                input {
                    r#type: "text",
                    value: "{session_id}",
                    oninput: move |evt: Event<FormData>| {
                        app_state.write().session.set_session_id(SessionId::new(&evt.value()));
                    },
                }
            }

            div { class: "form-row",
                label { "{tr.user_id_label}" }
                input {
                    r#type: "text",
                    value: "{user_id}",
                    oninput: move |evt: Event<FormData>| {
                        app_state.write().session.set_user_id(UserId::new(&evt.value()));
                    },
                }
            }

            div { class: "record-actions",
                button {
                    class: "record-btn",
                    onclick: {
                        let client = client.clone();
                        move |_| {
                            let client = client.clone();
                            let user_id = app_state.read().session.user_id().clone();
                            spawn(async move {
                                let notice = create_user_state(&client, user_id).await;
                                app_state.write().show_notice(notice);
                            });
                        }
                    },
                    "{tr.create_user_state}"
                }
                button {
                    class: "record-btn",
                    onclick: move |_| {
                        let client = client.clone();
                        spawn(async move {
                            let notice = create_world_state(&client).await;
                            app_state.write().show_notice(notice);
                        });
                    },
                    "{tr.create_world_state}"
                }
            }
        }
    }
}
