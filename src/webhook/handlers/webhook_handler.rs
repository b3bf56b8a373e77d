use crate::models::telegram::Update;
use crate::processing::update_processor::process_update;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode};
use serde_json::Value;
use shared::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub const LIVENESS_MESSAGE: &str = "Gy Telegram AI Bot - alive";

/// GET / - liveness probe
pub async fn home() -> &'static str {
    LIVENESS_MESSAGE
}

/// POST /webhook/<secret>
///
/// The update is handled to completion before answering. Anything past body
/// parsing answers 200 so Telegram never redelivers an update the bot has
/// already acted on.
pub async fn post_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let update = parse_update(&body)?;
    info!(update_id = ?update.update_id, "📥 Webhook received");

    process_update(&state, update).await;

    Ok(StatusCode::OK)
}

/// Absent, unparseable or falsy (`null`, `false`, `0`, `""`, `{}`, `[]`)
/// bodies are rejected.
/// Valid JSON of an unknown shape is acknowledged as an update with nothing
/// in it.
pub fn parse_update(body: &[u8]) -> Result<Update, AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request(format!("Unparseable update body: {}", e)))?;

    let is_empty = match &value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if is_empty {
        return Err(AppError::bad_request("Empty update body"));
    }

    match serde_json::from_value::<Update>(value) {
        Ok(update) => Ok(update),
        Err(e) => {
            warn!("Update shape not recognised, acknowledging without action: {}", e);
            Ok(Update::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_absent_and_malformed_bodies() {
        let bodies: [&[u8]; 10] = [
            b"", b"not json", b"{\"message\":", b"null", b"false", b"0", b"0.0", b"\"\"", b"{}", b"[]",
        ];
        for body in bodies {
            let err = parse_update(body).unwrap_err();
            assert!(matches!(err, AppError::BadRequest { .. }), "body {:?}", body);
        }
    }

    #[test]
    fn test_unknown_shapes_become_empty_updates() {
        for body in [&b"[1, 2]"[..], b"true", b"7", b"\"hello\""] {
            let update = parse_update(body).unwrap();
            assert!(update.message.is_none() && update.callback_query.is_none());
        }

        // message without a chat cannot be answered
        let update = parse_update(br#"{"update_id": 4, "message": {"text": "hi"}}"#).unwrap();
        assert!(update.message.is_none());
    }

    #[test]
    fn test_parses_message_update() {
        let update = parse_update(br#"{"update_id": 4, "message": {"chat": {"id": 9}, "text": "hi"}}"#).unwrap();
        assert_eq!(update.update_id, Some(4));
        assert_eq!(update.message.unwrap().chat.id, 9);
    }
}
