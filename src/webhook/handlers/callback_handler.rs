use super::log_delivery_failure;
use crate::{
    models::telegram::ChatId,
    services::telegram_service::escape_html,
    state::AppState,
};
use std::sync::Arc;
use tracing::{error, info};

pub fn callback_toast(model: &str) -> String {
    format!("Model diset ke {}", model)
}

pub fn selection_confirmation(model: &str) -> String {
    format!(
        "Kamu memilih model: {}\nKirim prompt (deskripsi gambar) sekarang.",
        escape_html(model)
    )
}

/// Handles a `model:<key>` button press: stores the key, clears the button's
/// loading state and asks for a prompt.
pub async fn handle_model_selection(
    app_state: &Arc<AppState>,
    chat_id: ChatId,
    callback_id: &str,
    model: &str,
) {
    info!(chat_id, model, "Model selected");

    if let Err(e) = app_state.sessions.select_model(chat_id, model).await {
        error!(chat_id, model, "Failed to store model selection: {}", e);
    }

    let result = app_state
        .telegram
        .answer_callback_query(callback_id, Some(&callback_toast(model)))
        .await;
    log_delivery_failure(result, "answer callback query", chat_id);

    let result = app_state
        .telegram
        .send_message(chat_id, &selection_confirmation(model), None)
        .await;
    log_delivery_failure(result, "send selection confirmation", chat_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_texts() {
        assert_eq!(callback_toast("kling"), "Model diset ke kling");
        assert_eq!(
            selection_confirmation("kling"),
            "Kamu memilih model: kling\nKirim prompt (deskripsi gambar) sekarang."
        );
    }
}
