//! Request payloads sent to the provider
//!
//! Field names are exactly what the provider expects. Optional fields are
//! omitted rather than serialized as `null`; some providers reject null enum
//! values.

use serde::{Deserialize, Serialize};

use super::types::Message;

/// Model id sent with every speech request
pub const SPEECH_MODEL: &str = "tts-1";

/// Response format directive for strict-JSON mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// Chat model id
    pub model: String,
    /// System turn followed by the conversation
    pub messages: Vec<Message>,
    /// Effective token budget
    pub max_tokens: u32,
    /// Present only in JSON mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// Image generation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    /// Number of images
    pub n: u32,
    /// `"{width}x{height}"`
    pub size: String,
}

/// Text-to-speech request; the response is raw audio, not JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeechRequest {
    pub model: String,
    pub input: String,
    pub voice: String,
}

/// Image analysis request for a remote image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageAnalysisRequest {
    pub model: String,
    pub image_url: String,
    /// Free-form instructions for the analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
}
