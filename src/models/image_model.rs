use super::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Model used for chats that never picked one.
pub const DEFAULT_MODEL: &str = "nano";

/// Prefix of the callback payload carried by the model buttons.
pub const MODEL_CALLBACK_PREFIX: &str = "model:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelChoice {
    pub key: &'static str,
    pub label: &'static str,
}

/// Models offered on the `/start` keyboard, in display order.
pub const MODEL_CHOICES: [ModelChoice; 2] = [
    ModelChoice { key: "nano", label: "🎨 Nano Banana" },
    ModelChoice { key: "kling", label: "⚡ Kling Pro" },
];

impl ModelChoice {
    pub fn callback_data(&self) -> String {
        format!("{}{}", MODEL_CALLBACK_PREFIX, self.key)
    }
}

pub fn model_selection_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::single_column(
        MODEL_CHOICES
            .iter()
            .map(|choice| InlineKeyboardButton::new(choice.label, choice.callback_data())),
    )
}

/// Extracts `<key>` from a `model:<key>` payload. Only the first `:` splits,
/// so keys may themselves contain colons. Empty keys are not a selection.
pub fn parse_model_callback(data: &str) -> Option<&str> {
    data.strip_prefix(MODEL_CALLBACK_PREFIX)
        .filter(|key| !key.is_empty())
}
