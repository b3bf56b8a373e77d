use crate::models::telegram::{
    AnswerCallbackQueryRequest, ApiResponse, ChatId, InlineKeyboardMarkup, SendMessageRequest,
    SendPhotoRequest,
};
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use shared::config::TelegramConfig;
use shared::{AppError, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Text is always rendered with Telegram's HTML parse mode.
const PARSE_MODE: &str = "HTML";

/// Escapes text interpolated into an HTML-mode message. Telegram rejects the
/// whole message when it contains an unbalanced `<`.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Thin client over the three Bot API methods the webhook needs.
#[derive(Clone)]
pub struct TelegramClient {
    http_client: ReqwestClient,
    api_base_url: String,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
        })
    }

    /// Sends a text message, optionally with an inline keyboard under it.
    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        let request_body = SendMessageRequest {
            chat_id,
            text: text.to_string(),
            parse_mode: PARSE_MODE,
            reply_markup: keyboard,
        };

        self.call("sendMessage", &request_body).await?;
        info!(chat_id, "Successfully sent text message");
        Ok(())
    }

    /// Sends a photo by URL; Telegram fetches the image itself.
    pub async fn send_photo(&self, chat_id: ChatId, photo_url: &str, caption: Option<&str>) -> Result<()> {
        let request_body = SendPhotoRequest {
            chat_id,
            photo: photo_url.to_string(),
            caption: caption.map(|c| c.to_string()),
        };

        self.call("sendPhoto", &request_body).await?;
        info!(chat_id, "Successfully sent photo");
        Ok(())
    }

    /// Clears the loading indicator on the pressed button and shows `text` as a toast.
    pub async fn answer_callback_query(&self, callback_query_id: &str, text: Option<&str>) -> Result<()> {
        let request_body = AnswerCallbackQueryRequest {
            callback_query_id: callback_query_id.to_string(),
            text: text.map(|t| t.to_string()),
        };

        self.call("answerCallbackQuery", &request_body).await?;
        debug!(callback_query_id, "Callback query answered");
        Ok(())
    }

    async fn call<B: Serialize>(&self, method: &str, body: &B) -> Result<()> {
        // The token is part of the path, so this URL must never be logged.
        let url = format!("{}/bot{}/{}", self.api_base_url, self.bot_token, method);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let response_body = response.text().await.map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            return Err(AppError::external_service(
                "telegram",
                format!("{} failed with {}: {}", method, status, response_body),
            ));
        }

        // Some proxies answer 200 with an empty body; only an explicit ok=false is a failure.
        if let Ok(api_response) = serde_json::from_str::<ApiResponse>(&response_body) {
            if !api_response.ok {
                return Err(AppError::external_service(
                    "telegram",
                    format!(
                        "{} rejected: {}",
                        method,
                        api_response.description.unwrap_or_default()
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::telegram::InlineKeyboardButton;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> TelegramClient {
        TelegramClient::new(&TelegramConfig {
            bot_token: "123:abc".to_string(),
            api_base_url: server.uri(),
            request_timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_html("<b>a & b</b>"), "&lt;b&gt;a &amp; b&lt;/b&gt;");
    }

    #[tokio::test]
    async fn test_send_message_posts_html_with_keyboard() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({
                "chat_id": 42,
                "text": "pick",
                "parse_mode": "HTML",
                "reply_markup": {"inline_keyboard": [[{"text": "N", "callback_data": "model:nano"}]]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let keyboard = InlineKeyboardMarkup::single_column([InlineKeyboardButton::new("N", "model:nano")]);
        client_for(&server)
            .send_message(42, "pick", Some(keyboard))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_photo_and_answer_callback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendPhoto"))
            .and(body_json(json!({"chat_id": 42, "photo": "https://img/1.png", "caption": "c"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/answerCallbackQuery"))
            .and(body_json(json!({"callback_query_id": "cb", "text": "done"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.send_photo(42, "https://img/1.png", Some("c")).await.unwrap();
        client.answer_callback_query("cb", Some("done")).await.unwrap();
    }

    #[tokio::test]
    async fn test_platform_errors_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_string("chat not found"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendPhoto"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": false, "description": "wrong file identifier"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.send_message(1, "x", None).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalService { .. }));
        assert!(err.to_string().contains("chat not found"));

        let err = client.send_photo(1, "bad", None).await.unwrap_err();
        assert!(err.to_string().contains("wrong file identifier"));
    }
}
