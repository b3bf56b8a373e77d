pub mod deduplication;
pub mod handlers;
pub mod routes;

// Re-export main components
pub use deduplication::UpdateDeduplicator;
pub use handlers::{home, post_webhook};
pub use routes::create_webhook_router;
