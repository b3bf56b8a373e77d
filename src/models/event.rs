use super::image_model::parse_model_callback;
use super::telegram::{ChatId, Update};

/// Command that opens the model picker. Matched as a prefix of the message
/// text, so `/start@GyBot` and `/start now` both count.
pub const START_COMMAND: &str = "/start";

/// What an inbound update asks the bot to do, decided before any side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Start {
        chat_id: ChatId,
    },
    Prompt {
        chat_id: ChatId,
        prompt: String,
    },
    ModelSelected {
        chat_id: ChatId,
        callback_id: String,
        model: String,
    },
    /// Edited messages, stickers, channel posts, foreign callbacks...
    /// Acknowledged and otherwise left alone.
    Unhandled,
}

impl InboundEvent {
    pub fn chat_id(&self) -> Option<ChatId> {
        match self {
            InboundEvent::Start { chat_id }
            | InboundEvent::Prompt { chat_id, .. }
            | InboundEvent::ModelSelected { chat_id, .. } => Some(*chat_id),
            InboundEvent::Unhandled => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Start { .. } => "start",
            InboundEvent::Prompt { .. } => "prompt",
            InboundEvent::ModelSelected { .. } => "model_selected",
            InboundEvent::Unhandled => "unhandled",
        }
    }
}

impl From<&Update> for InboundEvent {
    fn from(update: &Update) -> Self {
        if let Some(message) = &update.message {
            if let Some(text) = &message.text {
                let chat_id = message.chat.id;
                if text.starts_with(START_COMMAND) {
                    return InboundEvent::Start { chat_id };
                }
                return InboundEvent::Prompt {
                    chat_id,
                    prompt: text.trim().to_string(),
                };
            }
        }

        if let Some(callback) = &update.callback_query {
            let model = callback.data.as_deref().and_then(parse_model_callback);
            let chat_id = callback.message.as_ref().map(|message| message.chat.id);
            if let (Some(model), Some(chat_id)) = (model, chat_id) {
                return InboundEvent::ModelSelected {
                    chat_id,
                    callback_id: callback.id.clone(),
                    model: model.to_string(),
                };
            }
        }

        InboundEvent::Unhandled
    }
}
