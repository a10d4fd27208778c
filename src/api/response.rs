//! Response payloads returned by the provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ToolsError, ToolsResult};

/// Canonical not-available marker for URL-typed results
pub const NOT_AVAILABLE_URL: &str = "Error";

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Usage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// Message in a completion choice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// Role as sent by the provider, kept verbatim
    pub role: String,
    /// Content of the message (absent for refusals and tool calls)
    #[serde(default)]
    pub content: Option<String>,
}

/// A completion choice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    pub index: u32,
    pub message: ChoiceMessage,
    #[serde(default)]
    pub logprobs: Option<serde_json::Value>,
    /// Reason the generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Chat completion response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    /// Unix timestamp of creation
    pub created: u64,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub system_fingerprint: Option<String>,
}

/// Successful chat result
pub type ChatCompletion = ChatCompletionResponse;

impl ChatCompletionResponse {
    /// Text of the choice at `index`
    ///
    /// An out-of-range index is a [`ToolsError::ChoiceOutOfRange`], never a panic.
    /// A choice without content yields an empty string.
    pub fn choice_text(&self, index: usize) -> ToolsResult<&str> {
        self.choices
            .get(index)
            .map(|choice| choice.message.content.as_deref().unwrap_or_default())
            .ok_or(ToolsError::ChoiceOutOfRange {
                index,
                available: self.choices.len(),
            })
    }

    /// Text of the first choice
    pub fn first_text(&self) -> ToolsResult<&str> {
        self.choice_text(0)
    }

    /// `(text, finish_reason)` pairs in provider order
    pub fn texts(&self) -> Vec<(&str, Option<&str>)> {
        self.choices
            .iter()
            .map(|choice| {
                (
                    choice.message.content.as_deref().unwrap_or_default(),
                    choice.finish_reason.as_deref(),
                )
            })
            .collect()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.created)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    pub fn total_tokens(&self) -> Option<u32> {
        self.usage.map(|u| u.total_tokens)
    }
}

/// One generated image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

/// Image generation response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub created: Option<u64>,
    pub data: Vec<ImageData>,
}

/// Successful image result
///
/// `urls` and `revised_prompts` are positionally parallel and in provider order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageGeneration {
    pub urls: Vec<String>,
    pub revised_prompts: Vec<Option<String>>,
}

impl From<ImageGenerationResponse> for ImageGeneration {
    fn from(response: ImageGenerationResponse) -> Self {
        let (urls, revised_prompts) = response
            .data
            .into_iter()
            .map(|image| {
                (
                    image.url.unwrap_or_else(|| NOT_AVAILABLE_URL.to_string()),
                    image.revised_prompt,
                )
            })
            .unzip();
        Self {
            urls,
            revised_prompts,
        }
    }
}

impl ImageGeneration {
    /// URL at `index`, or [`ToolsError::NotAvailable`]
    pub fn url(&self, index: usize) -> ToolsResult<&str> {
        match self.urls.get(index) {
            Some(url) if url != NOT_AVAILABLE_URL => Ok(url.as_str()),
            _ => Err(ToolsError::NotAvailable),
        }
    }
}

/// A label produced by image analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

/// Image analysis response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageAnalysisResponse {
    pub labels: Vec<Label>,
}

impl ImageAnalysisResponse {
    pub fn label_names(self) -> Vec<String> {
        self.labels.into_iter().map(|label| label.name).collect()
    }
}
