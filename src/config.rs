//! Configuration management for AiTools
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_IMAGE_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";
pub const DEFAULT_SPEECH_ENDPOINT: &str = "https://api.openai.com/v1/audio/speech";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4-2024-05-13";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_VOICE: &str = "alloy";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_IMAGE_SIZE: u32 = 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider API key (bearer credential)
    pub api_key: String,

    /// Chat completions endpoint URL
    pub chat_endpoint: String,
    /// Image generations endpoint URL
    pub image_endpoint: String,
    /// Text-to-speech endpoint URL
    pub speech_endpoint: String,

    /// Model used for chat completions
    pub chat_model: String,
    /// Model used for image generation
    pub image_model: String,

    /// Floor applied to every chat token budget
    pub default_max_tokens: u32,
    /// Floor applied to every requested image width
    pub default_image_width: u32,
    /// Floor applied to every requested image height
    pub default_image_height: u32,
    /// Voice used when a speech job does not name one
    pub voice: String,

    /// Blob service base URL (e.g. `https://account.blob.core.windows.net`)
    pub blob_service_url: Option<String>,
    /// Shared access signature appended to blob requests
    pub blob_sas_token: Option<String>,

    /// Timeout applied to every HTTP call (in seconds)
    pub http_timeout_seconds: u64,
    /// Maximum number of image downloads in flight at once
    pub download_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            image_endpoint: DEFAULT_IMAGE_ENDPOINT.to_string(),
            speech_endpoint: DEFAULT_SPEECH_ENDPOINT.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            default_image_width: DEFAULT_IMAGE_SIZE,
            default_image_height: DEFAULT_IMAGE_SIZE,
            voice: DEFAULT_VOICE.to_string(),
            blob_service_url: None,
            blob_sas_token: None,
            http_timeout_seconds: 300,
            download_concurrency: 4,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),

            chat_endpoint: env::var("OPENAI_CHAT_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_CHAT_ENDPOINT.to_string()),
            image_endpoint: env::var("OPENAI_IMAGE_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_IMAGE_ENDPOINT.to_string()),
            speech_endpoint: env::var("OPENAI_TTS_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_SPEECH_ENDPOINT.to_string()),

            chat_model: env::var("OPENAI_CHAT_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            image_model: env::var("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),

            default_max_tokens: env::var("OPENAI_DEFAULT_MAX_TOKENS")
                .unwrap_or_else(|_| DEFAULT_MAX_TOKENS.to_string())
                .parse()
                .context("Invalid OPENAI_DEFAULT_MAX_TOKENS")?,
            default_image_width: env::var("OPENAI_DEFAULT_IMAGE_WIDTH")
                .unwrap_or_else(|_| DEFAULT_IMAGE_SIZE.to_string())
                .parse()
                .context("Invalid OPENAI_DEFAULT_IMAGE_WIDTH")?,
            default_image_height: env::var("OPENAI_DEFAULT_IMAGE_HEIGHT")
                .unwrap_or_else(|_| DEFAULT_IMAGE_SIZE.to_string())
                .parse()
                .context("Invalid OPENAI_DEFAULT_IMAGE_HEIGHT")?,
            voice: env::var("OPENAI_VOICE").unwrap_or_else(|_| DEFAULT_VOICE.to_string()),

            blob_service_url: env::var("BLOB_SERVICE_URL").ok(),
            blob_sas_token: env::var("BLOB_SAS_TOKEN").ok(),

            http_timeout_seconds: env::var("HTTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .context("Invalid HTTP_TIMEOUT_SECONDS")?,
            download_concurrency: env::var("DOWNLOAD_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .context("Invalid DOWNLOAD_CONCURRENCY")?,
        })
    }
}
