use agentdesk_sdk::RecordNotice;
use dioxus::prelude::*;

use crate::i18n::{t, use_locale};

/// Blocking acknowledgement of a record-creation attempt.
#[component]
pub fn NoticeDialog(notice: RecordNotice, on_dismiss: EventHandler<()>) -> Element {
    let locale = use_locale();
    let tr = t(*locale.read());
    let text = tr.notice(notice);

    rsx! {
        div { class: "modal-backdrop",
            div {
                class: if notice.created { "modal success" } else { "modal failure" },
                p { class: "modal-text", "{text}" }
                button {
                    class: "modal-ok",
                    autofocus: true,
                    onclick: move |_| on_dismiss.call(()),
                    "{tr.ok}"
                }
            }
        }
    }
}
