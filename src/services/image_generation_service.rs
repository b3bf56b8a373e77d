use crate::models::generation::GenerationRequest;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use shared::config::GenerationConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Prefix of every chat message reporting a failed generation.
pub const GENERATION_ERROR_PREFIX: &str = "Error saat generate:";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Freepik API error: {status} {body}")]
    Backend { status: u16, body: String },

    #[error("Format response Freepik tidak dikenali. Perlu sesuaikan parsing.")]
    UnrecognizedResponse,

    #[error("Freepik API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Maps a generation failure to the text shown in the chat.
pub fn user_facing_error(error: &GenerationError) -> String {
    format!("{} {}", GENERATION_ERROR_PREFIX, error)
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Returns the URL of the generated image.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GenerationError>;
}

/// Picks the Freepik backend when a key is configured, demo mode otherwise.
pub fn build_image_generator(config: &GenerationConfig) -> Result<Arc<dyn ImageGenerator>, GenerationError> {
    match &config.api_key {
        Some(api_key) => {
            info!("🎨 Image generation backend: {}", config.endpoint);
            Ok(Arc::new(FreepikImageGenerator::new(config, api_key.clone())?))
        }
        None => {
            warn!("FREEPIK_API_KEY not set, every prompt gets the placeholder image");
            Ok(Arc::new(PlaceholderImageGenerator::new(config.placeholder_url.clone())))
        }
    }
}

/// Demo mode: answers every prompt with the same image.
pub struct PlaceholderImageGenerator {
    placeholder_url: String,
}

impl PlaceholderImageGenerator {
    pub fn new(placeholder_url: String) -> Self {
        Self { placeholder_url }
    }
}

#[async_trait]
impl ImageGenerator for PlaceholderImageGenerator {
    async fn generate(&self, _prompt: &str, _model: &str) -> Result<String, GenerationError> {
        Ok(self.placeholder_url.clone())
    }
}

pub struct FreepikImageGenerator {
    http_client: ReqwestClient,
    endpoint: String,
    api_key: String,
    timeout: Duration,
    image_size: String,
    image_count: u32,
}

impl FreepikImageGenerator {
    pub fn new(config: &GenerationConfig, api_key: String) -> Result<Self, GenerationError> {
        let http_client = ReqwestClient::builder().build()?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key,
            timeout: Duration::from_secs(config.timeout_seconds),
            image_size: config.image_size.clone(),
            image_count: config.image_count,
        })
    }
}

#[async_trait]
impl ImageGenerator for FreepikImageGenerator {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GenerationError> {
        let request_body = GenerationRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            size: self.image_size.clone(),
            n: self.image_count,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, "Freepik API returned an error");
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let data: serde_json::Value =
            serde_json::from_str(&body).map_err(|_| GenerationError::UnrecognizedResponse)?;

        match data.get("image_url").and_then(|url| url.as_str()) {
            Some(image_url) => {
                info!(model, "Image generated");
                Ok(image_url.to_string())
            }
            None => Err(GenerationError::UnrecognizedResponse),
        }
    }
}
