//! Configuration management for the bot

use crate::error::{AppError, Result};
use serde::Serialize;
use std::env;
use std::str::FromStr;

pub const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_FREEPIK_API_URL: &str = "https://api.freepik.com/v1/generate-image";
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/1024x1024.png?text=Demo+Image";
pub const DEFAULT_WEBHOOK_SECRET: &str = "change_this_secret";
pub const DEFAULT_SESSION_KEY_PREFIX: &str = "gy_bot:model";

#[derive(Debug, Clone, Serialize)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub generation: GenerationConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct TelegramConfig {
    #[serde(skip_serializing)]
    pub bot_token: String,
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    /// `None` puts the generator in demo mode.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub image_size: String,
    pub image_count: u32,
    pub placeholder_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(skip_serializing)]
    pub webhook_secret: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionConfig {
    /// `None` keeps model selections in process memory.
    pub redis_url: Option<String>,
    pub key_prefix: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values are treated
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = get("BOT_TOKEN")
            .ok_or_else(|| AppError::configuration("BOT_TOKEN environment variable required"))?;

        let webhook_secret = get("WEBHOOK_SECRET").unwrap_or_else(|| DEFAULT_WEBHOOK_SECRET.to_string());
        // The secret becomes a literal route segment; these characters would
        // turn it into a path parameter, wildcard or extra segment.
        if webhook_secret.contains(|c: char| matches!(c, '/' | ':' | '*' | '{' | '}')) {
            return Err(AppError::configuration(
                "WEBHOOK_SECRET must be a single path segment without '/', ':', '*', '{' or '}'",
            ));
        }

        Ok(BotConfig {
            telegram: TelegramConfig {
                bot_token,
                api_base_url: get("TELEGRAM_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE_URL.to_string()),
                request_timeout_seconds: parse_or("TELEGRAM_TIMEOUT_SECONDS", get("TELEGRAM_TIMEOUT_SECONDS"), 30)?,
            },
            generation: GenerationConfig {
                api_key: get("FREEPIK_API_KEY"),
                endpoint: get("FREEPIK_API_URL")
                    .unwrap_or_else(|| DEFAULT_FREEPIK_API_URL.to_string()),
                timeout_seconds: parse_or("GENERATION_TIMEOUT_SECONDS", get("GENERATION_TIMEOUT_SECONDS"), 120)?,
                image_size: "1024x1024".to_string(),
                image_count: 1,
                placeholder_url: get("PLACEHOLDER_IMAGE_URL")
                    .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE_URL.to_string()),
            },
            server: ServerConfig {
                port: parse_or("PORT", get("PORT"), 5000)?,
                webhook_secret,
            },
            session: SessionConfig {
                redis_url: get("REDIS_URL"),
                key_prefix: get("SESSION_KEY_PREFIX")
                    .unwrap_or_else(|| DEFAULT_SESSION_KEY_PREFIX.to_string()),
            },
        })
    }

    pub fn is_demo_mode(&self) -> bool {
        self.generation.api_key.is_none()
    }

    pub fn webhook_path(&self) -> String {
        format!("/webhook/{}", self.server.webhook_secret)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .parse()
            .map_err(|e| AppError::configuration(format!("{} has invalid value '{}': {}", key, value, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_bot_token_is_configuration_error() {
        let err = BotConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    fn test_blank_bot_token_is_rejected() {
        let err = BotConfig::from_lookup(lookup_from(&[("BOT_TOKEN", "   ")])).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::from_lookup(lookup_from(&[("BOT_TOKEN", "123:abc")])).unwrap();

        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.telegram.api_base_url, DEFAULT_TELEGRAM_API_BASE_URL);
        assert_eq!(config.telegram.request_timeout_seconds, 30);
        assert_eq!(config.generation.api_key, None);
        assert!(config.is_demo_mode());
        assert_eq!(config.generation.endpoint, DEFAULT_FREEPIK_API_URL);
        assert_eq!(config.generation.timeout_seconds, 120);
        assert_eq!(config.generation.image_size, "1024x1024");
        assert_eq!(config.generation.image_count, 1);
        assert_eq!(config.generation.placeholder_url, DEFAULT_PLACEHOLDER_IMAGE_URL);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.webhook_secret, DEFAULT_WEBHOOK_SECRET);
        assert_eq!(config.webhook_path(), "/webhook/change_this_secret");
        assert_eq!(config.session.redis_url, None);
        assert_eq!(config.session.key_prefix, DEFAULT_SESSION_KEY_PREFIX);
    }

    #[test]
    fn test_overrides() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("FREEPIK_API_KEY", "fp-key"),
            ("WEBHOOK_SECRET", "s3cr3t"),
            ("PORT", "8080"),
            ("REDIS_URL", "redis://127.0.0.1:6379"),
        ]))
        .unwrap();

        assert!(!config.is_demo_mode());
        assert_eq!(config.generation.api_key.as_deref(), Some("fp-key"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.webhook_path(), "/webhook/s3cr3t");
        assert_eq!(config.session.redis_url.as_deref(), Some("redis://127.0.0.1:6379"));
    }

    #[test]
    fn test_invalid_port_is_configuration_error() {
        let err = BotConfig::from_lookup(lookup_from(&[("BOT_TOKEN", "t"), ("PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_webhook_secret_must_be_literal_segment() {
        for secret in ["a/b", ":secret", "*rest", "{id}"] {
            let err = BotConfig::from_lookup(lookup_from(&[("BOT_TOKEN", "t"), ("WEBHOOK_SECRET", secret)]))
                .unwrap_err();
            assert!(matches!(err, AppError::Configuration { .. }), "secret {}", secret);
        }
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("FREEPIK_API_KEY", "fp-key"),
        ]))
        .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("123:abc"));
        assert!(!json.contains("fp-key"));
        assert!(!json.contains(DEFAULT_WEBHOOK_SECRET));
    }
}
