use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers::{home, post_webhook};

/// Liveness at `/` and the update endpoint at `/webhook/<secret>`. Any other
/// path, including a wrong secret, has no route.
pub fn create_webhook_router(app_state: Arc<AppState>) -> Router {
    let webhook_path = app_state.config.webhook_path();

    Router::new()
        .route("/", get(home))
        .route(&webhook_path, post(post_webhook))
        .with_state(app_state)
}
