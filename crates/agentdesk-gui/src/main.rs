mod components;
mod i18n;
mod state;

use agentdesk_sdk::AgentDeskClient;
use dioxus::prelude::*;
use tracing_subscriber::EnvFilter;

use components::chat_panel::ChatPanel;
use components::notice_dialog::NoticeDialog;
use components::settings_panel::SettingsPanel;
use state::AppState;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("starting AgentDesk window");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let mut app_state = use_signal(AppState::new);
    let mut locale_signal = use_signal(i18n::Locale::default);
    use_context_provider(|| locale_signal);
    // Resolves the base URL on first use; it is fixed for the process lifetime.
    use_context_provider(AgentDeskClient::from_env);

    let locale = *locale_signal.read();
    let tr = i18n::t(locale);
    let notice = app_state.read().notice;

    rsx! {
        style { {include_str!("style.css")} }
        div { class: "app-root",
            header { class: "app-header",
                h1 { "{tr.app_title}" }
                button {
                    class: "locale-toggle",
                    onclick: move |_| {
                        let next = locale_signal.read().next();
                        locale_signal.set(next);
                    },
                    "{locale.next().label()}"
                }
            }

            div { class: "app-body",
                SettingsPanel { app_state }
                ChatPanel { app_state }
            }

            if let Some(notice) = notice {
                NoticeDialog {
                    notice,
                    on_dismiss: move |_| app_state.write().dismiss_notice(),
                }
            }
        }
    }
}
