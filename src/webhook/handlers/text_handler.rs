use super::log_delivery_failure;
use crate::{
    models::telegram::ChatId,
    services::{
        image_generation_service::user_facing_error,
        telegram_service::escape_html,
    },
    state::AppState,
};
use std::sync::Arc;
use tracing::{info, warn};

pub const NO_IMAGE_MESSAGE: &str = "Maaf, gagal membuat gambar (no image URL).";

pub fn processing_message(model: &str) -> String {
    format!(
        "Generate gambar dengan model <b>{}</b>. Sedang diproses... Mohon tunggu.",
        escape_html(model)
    )
}

/// Photo captions go out without a parse mode, so they are not escaped.
pub fn photo_caption(model: &str, prompt: &str) -> String {
    format!("Model: {}\nPrompt: {}", model, prompt)
}

/// Treats the message text as a prompt for the chat's selected model.
///
/// Generation failures end up as a chat message; nothing here can fail the
/// webhook response.
pub async fn handle_prompt(app_state: &Arc<AppState>, chat_id: ChatId, prompt: &str) {
    let model = app_state.sessions.effective_model(chat_id).await;
    info!(chat_id, model = %model, "Routing prompt to image generation");

    let result = app_state
        .telegram
        .send_message(chat_id, &processing_message(&model), None)
        .await;
    log_delivery_failure(result, "send processing notice", chat_id);

    match app_state.image_generator.generate(prompt, &model).await {
        Ok(image_url) if image_url.is_empty() => {
            warn!(chat_id, model = %model, "Image backend returned an empty image URL");
            let result = app_state.telegram.send_message(chat_id, NO_IMAGE_MESSAGE, None).await;
            log_delivery_failure(result, "send empty-result notice", chat_id);
        }
        Ok(image_url) => {
            let caption = photo_caption(&model, prompt);
            let result = app_state
                .telegram
                .send_photo(chat_id, &image_url, Some(&caption))
                .await;
            log_delivery_failure(result, "send generated image", chat_id);
        }
        Err(e) => {
            warn!(chat_id, model = %model, "Image generation failed: {}", e);
            let text = escape_html(&user_facing_error(&e));
            let result = app_state.telegram.send_message(chat_id, &text, None).await;
            log_delivery_failure(result, "send generation error", chat_id);
        }
    }
}
