use crate::models::event::InboundEvent;
use crate::models::telegram::Update;
use crate::state::AppState;
use crate::webhook::handlers::{handle_model_selection, handle_prompt, handle_start_command};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Classifies an update and runs the matching handler to completion.
pub async fn process_update(state: &Arc<AppState>, update: Update) {
    if let Some(update_id) = update.update_id {
        if state.update_deduplicator.is_duplicate(update_id) {
            warn!(update_id, "🚫 Duplicate update skipped");
            return;
        }
    }

    let event = InboundEvent::from(&update);
    info!(kind = event.kind(), chat_id = ?event.chat_id(), "Dispatching update");

    match event {
        InboundEvent::Start { chat_id } => handle_start_command(state, chat_id).await,
        InboundEvent::Prompt { chat_id, prompt } => handle_prompt(state, chat_id, &prompt).await,
        InboundEvent::ModelSelected {
            chat_id,
            callback_id,
            model,
        } => handle_model_selection(state, chat_id, &callback_id, &model).await,
        InboundEvent::Unhandled => {
            debug!(update_id = ?update.update_id, "Update acknowledged without action");
        }
    }
}
