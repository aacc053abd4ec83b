use agentdesk_sdk::{RecordKind, RecordNotice};
use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Locale {
    #[default]
    ZhTw,
    En,
}

impl Locale {
    pub fn label(&self) -> &'static str {
        match self {
            Locale::ZhTw => "中文",
            Locale::En => "EN",
        }
    }

    pub fn next(&self) -> Locale {
        match self {
            Locale::ZhTw => Locale::En,
            Locale::En => Locale::ZhTw,
        }
    }
}

/// Get the current locale from Dioxus context.
/// Must be called inside a component where `provide_context` was used.
pub fn use_locale() -> Signal<Locale> {
    use_context::<Signal<Locale>>()
}

/// All translatable strings in the application.
/// Call `t(locale)` to get the struct for a given locale.
pub struct T {
    // ── General ──
    pub app_title: &'static str,
    pub ok: &'static str,

    // ── Settings ──
    pub settings_title: &'static str,
    pub session_id_label: &'static str,
    pub user_id_label: &'static str,
    pub create_user_state: &'static str,
    pub create_world_state: &'static str,

    // ── Record notices ──
    pub user_state_created: &'static str,
    pub user_state_failed: &'static str,
    pub world_state_created: &'static str,
    pub world_state_failed: &'static str,

    // ── Chat ──
    pub chat_title: &'static str,
    pub empty_transcript: &'static str,
    pub you: &'static str,
    pub agent: &'static str,
    pub responding: &'static str,
    pub input_placeholder: &'static str,
    pub send: &'static str,
    pub chat_error: &'static str,
}

impl T {
    /// Text of the acknowledgement shown after a record creation attempt.
    pub fn notice(&self, notice: RecordNotice) -> &'static str {
        match (notice.kind, notice.created) {
            (RecordKind::UserState, true) => self.user_state_created,
            (RecordKind::UserState, false) => self.user_state_failed,
            (RecordKind::WorldState, true) => self.world_state_created,
            (RecordKind::WorldState, false) => self.world_state_failed,
        }
    }
}

pub fn t(locale: Locale) -> T {
    match locale {
        Locale::ZhTw => T {
            // General
            app_title: "LLM Agent Web App",
            ok: "確定",

            // Settings
            settings_title: "設定",
            session_id_label: "Session ID",
            user_id_label: "User ID",
            create_user_state: "建立 User State",
            create_world_state: "建立 World State",

            // Record notices
            user_state_created: "User State 建立成功！",
            user_state_failed: "建立 User State 失敗",
            world_state_created: "World State 建立成功！",
            world_state_failed: "建立 World State 失敗",

            // Chat
            chat_title: "與 Agent 對話",
            empty_transcript: "開始與 Agent 對話吧！",
            you: "您",
            agent: "Agent",
            responding: "Agent 回覆中",
            input_placeholder: "輸入訊息...",
            send: "傳送",
            chat_error: "錯誤：無法連接到後端服務。",
        },
        Locale::En => T {
            // General
            app_title: "LLM Agent Web App",
            ok: "OK",

            // Settings
            settings_title: "Settings",
            session_id_label: "Session ID",
            user_id_label: "User ID",
            create_user_state: "Create User State",
            create_world_state: "Create World State",

            // Record notices
            user_state_created: "User State created!",
            user_state_failed: "Failed to create User State",
            world_state_created: "World State created!",
            world_state_failed: "Failed to create World State",

            // Chat
            chat_title: "Chat with the Agent",
            empty_transcript: "Start chatting with the agent!",
            you: "You",
            agent: "Agent",
            responding: "Agent is responding",
            input_placeholder: "Type a message...",
            send: "Send",
            chat_error: "Error: unable to reach the backend service.",
        },
    }
}
