use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod models;
pub mod processing;
pub mod services;
pub mod state;
pub mod webhook;

use state::AppState;
use webhook::create_webhook_router;

/// Telegram updates are small JSON documents; anything bigger is not one.
const MAX_UPDATE_BODY_BYTES: usize = 1024 * 1024;

pub fn create_app_router(app_state: Arc<AppState>) -> Router {
    create_webhook_router(app_state)
        .layer(DefaultBodyLimit::max(MAX_UPDATE_BODY_BYTES))
        // Spans carry only the method: the request path holds the webhook secret.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!("http_request", method = %request.method())
                }),
        )
}
