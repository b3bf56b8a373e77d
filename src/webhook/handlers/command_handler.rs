use super::log_delivery_failure;
use crate::{
    models::{image_model::model_selection_keyboard, telegram::ChatId},
    state::AppState,
};
use std::sync::Arc;
use tracing::info;

pub const GREETING_MESSAGE: &str = "Halo Gy! Pilih model AI untuk generate gambar:";

/// `/start`: greets the user and offers the model picker.
pub async fn handle_start_command(app_state: &Arc<AppState>, chat_id: ChatId) {
    info!(chat_id, "Processing /start command");

    let result = app_state
        .telegram
        .send_message(chat_id, GREETING_MESSAGE, Some(model_selection_keyboard()))
        .await;
    log_delivery_failure(result, "send model picker", chat_id);
}
