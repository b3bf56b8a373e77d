use crate::services::image_generation_service::{build_image_generator, ImageGenerator};
use crate::services::session_service::{build_session_store, SessionStore};
use crate::services::telegram_service::TelegramClient;
use crate::webhook::UpdateDeduplicator;
use shared::{AppError, BotConfig};
use std::sync::Arc;

/// Everything a webhook request needs, injected through axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BotConfig>,
    pub telegram: TelegramClient,
    pub image_generator: Arc<dyn ImageGenerator>,
    pub sessions: Arc<dyn SessionStore>,
    pub update_deduplicator: UpdateDeduplicator,
}

impl AppState {
    pub fn new(config: BotConfig) -> shared::Result<Self> {
        let telegram = TelegramClient::new(&config.telegram)?;

        let image_generator = build_image_generator(&config.generation).map_err(|e| {
            AppError::configuration(format!("Failed to build image generation client: {}", e))
        })?;

        let sessions = build_session_store(&config.session)?;

        Ok(AppState {
            config: Arc::new(config),
            telegram,
            image_generator,
            sessions,
            update_deduplicator: UpdateDeduplicator::default(),
        })
    }
}
