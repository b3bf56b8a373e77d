use crate::models::image_model::DEFAULT_MODEL;
use crate::models::telegram::ChatId;
use async_trait::async_trait;
use dashmap::DashMap;
use deadpool_redis::{Connection, Pool};
use redis::{AsyncCommands, RedisError};
use shared::config::SessionConfig;
use shared::{AppError, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Per-chat model selection. Implementations are shared by every request, so
/// concurrent writes for the same chat resolve as last-write-wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn selected_model(&self, chat_id: ChatId) -> Result<Option<String>>;

    async fn select_model(&self, chat_id: ChatId, model: &str) -> Result<()>;

    /// The model a prompt from this chat runs with. A store failure falls
    /// back to the default instead of failing the prompt.
    async fn effective_model(&self, chat_id: ChatId) -> String {
        match self.selected_model(chat_id).await {
            Ok(Some(model)) => model,
            Ok(None) => DEFAULT_MODEL.to_string(),
            Err(e) => {
                warn!(chat_id, "Model lookup failed, using default: {}", e);
                DEFAULT_MODEL.to_string()
            }
        }
    }
}

/// Builds the Redis store when `REDIS_URL` is configured, the in-memory one otherwise.
pub fn build_session_store(config: &SessionConfig) -> Result<Arc<dyn SessionStore>> {
    match &config.redis_url {
        Some(redis_url) => {
            let pool = deadpool_redis::Config::from_url(redis_url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .map_err(|e| AppError::configuration(format!("Failed to create Redis pool: {}", e)))?;
            info!("💾 Model selections persisted in Redis");
            Ok(Arc::new(RedisSessionStore::new(pool, config.key_prefix.clone())))
        }
        None => {
            info!("💾 Model selections kept in memory (lost on restart)");
            Ok(Arc::new(InMemorySessionStore::new()))
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    models: Arc<DashMap<ChatId, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn selected_model(&self, chat_id: ChatId) -> Result<Option<String>> {
        Ok(self.models.get(&chat_id).map(|entry| entry.value().clone()))
    }

    async fn select_model(&self, chat_id: ChatId, model: &str) -> Result<()> {
        self.models.insert(chat_id, model.to_string());
        Ok(())
    }
}

/// Keys are `{prefix}:{chat_id}` and never expire, matching the in-memory
/// store's "until overwritten" lifetime.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool,
    key_prefix: String,
}

impl RedisSessionStore {
    pub fn new(pool: Pool, key_prefix: String) -> Self {
        Self { pool, key_prefix }
    }

    fn key(&self, chat_id: ChatId) -> String {
        format!("{}:{}", self.key_prefix, chat_id)
    }

    async fn get_connection(&self) -> std::result::Result<Connection, RedisError> {
        self.pool.get().await.map_err(|e| {
            error!("Failed to get Redis connection: {}", e);
            RedisError::from((redis::ErrorKind::IoError, "Connection pool error"))
        })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn selected_model(&self, chat_id: ChatId) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        let model: Option<String> = conn.get(self.key(chat_id)).await?;
        Ok(model)
    }

    async fn select_model(&self, chat_id: ChatId, model: &str) -> Result<()> {
        let mut conn = self.get_connection().await?;
        conn.set::<_, _, ()>(self.key(chat_id), model).await?;
        Ok(())
    }
}
