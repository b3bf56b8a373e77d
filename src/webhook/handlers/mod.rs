pub mod callback_handler;
pub mod command_handler;
pub mod text_handler;
pub mod webhook_handler;

use crate::models::telegram::ChatId;
use tracing::warn;

// Re-export main handlers for easy access
pub use callback_handler::handle_model_selection;
pub use command_handler::handle_start_command;
pub use text_handler::handle_prompt;
pub use webhook_handler::{home, post_webhook};

/// Outbound chat calls are fire-and-forget: a failed delivery is logged and
/// the rest of the flow carries on.
pub(crate) fn log_delivery_failure(result: shared::Result<()>, action: &str, chat_id: ChatId) {
    if let Err(e) = result {
        warn!(chat_id, "Failed to {}: {}", action, e);
    }
}
