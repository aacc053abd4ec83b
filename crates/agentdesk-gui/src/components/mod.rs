pub mod chat_panel;
pub mod notice_dialog;
pub mod settings_panel;
