//! Request builder
//!
//! Turns a logical intent (chat turn, image job, speech job, analysis) plus a
//! [`Session`] snapshot into the provider's payload.
//!
//! Configured defaults act as floors, never ceilings: the effective token
//! budget is `max(session default, requested)` and each image axis is floored
//! independently the same way. A caller asking for less than the configured
//! minimum still gets the minimum.

use crate::api::{
    ChatCompletionRequest, Content, ImageAnalysisRequest, ImageGenerationRequest, Message,
    ResponseFormat, Role, SpeechRequest, NOT_AVAILABLE_URL, SPEECH_MODEL,
};
use crate::error::{ToolsError, ToolsResult};
use crate::session::Session;

/// System turn used when the caller does not override it
pub const DEFAULT_SYSTEM_ROLE: &str = "You are a helpful AI";

/// Token budget assumed when the caller does not request one
pub const EMBEDDED_MAX_TOKENS: u32 = 300;

/// A chat turn to send
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatRequest {
    /// Overrides [`DEFAULT_SYSTEM_ROLE`]
    pub system_role: Option<String>,
    /// Prior turns in order, ending with the latest user turn
    pub turns: Vec<Message>,
    /// Image references attached to the latest user turn
    pub image_urls: Vec<String>,
    /// Requested token budget
    pub max_tokens: Option<u32>,
    /// Ask the provider for a strict JSON object
    pub json_mode: bool,
}

impl ChatRequest {
    /// Single user turn
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Message::user(prompt)],
            ..Self::default()
        }
    }

    /// Existing conversation
    ///
    /// A leading system turn replaces the default system role.
    pub fn conversation(mut turns: Vec<Message>) -> Self {
        let system_role = match turns.first() {
            Some(first) if first.role == Role::System => {
                Some(turns.remove(0).content.as_text())
            }
            _ => None,
        };
        Self {
            system_role,
            turns,
            ..Self::default()
        }
    }

    pub fn with_system_role(mut self, role: impl Into<String>) -> Self {
        self.system_role = Some(role.into());
        self
    }

    pub fn with_images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_urls.extend(urls.into_iter().map(Into::into));
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// Whether an image job rewrites its prompt through a chat call first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    /// Send the caller's prompt unchanged
    #[default]
    AsIs,
    /// Ask the chat model for an improved prompt, then generate from that
    Improve,
}

/// An image generation job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub prompt: String,
    /// Number of images, at least 1
    pub count: u32,
    /// Requested width; floored by the session default
    pub width: u32,
    /// Requested height; floored by the session default
    pub height: u32,
    pub prompt_mode: PromptMode,
}

impl ImageJob {
    /// One image at the session's default size, prompt sent as-is
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            count: 1,
            width: 0,
            height: 0,
            prompt_mode: PromptMode::AsIs,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn improve_prompt(mut self) -> Self {
        self.prompt_mode = PromptMode::Improve;
        self
    }

    /// Reject jobs the provider would refuse, before any call is made
    pub fn validate(&self) -> ToolsResult<()> {
        if self.count == 0 {
            return Err(ToolsError::InvalidRequest(
                "image count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `max(session default, requested or embedded default)`
pub fn effective_max_tokens(session: &Session, requested: Option<u32>) -> u32 {
    session
        .default_max_tokens
        .max(requested.unwrap_or(EMBEDDED_MAX_TOKENS))
}

/// Each axis independently floored by the session default
pub fn effective_image_size(session: &Session, width: u32, height: u32) -> (u32, u32) {
    (
        session.default_image_width.max(width),
        session.default_image_height.max(height),
    )
}

/// Build the chat payload
///
/// The system turn always comes first. Image references are appended as
/// content blocks on the last user turn; the not-available marker is dropped
/// so a failed upstream image step is never forwarded as an image.
pub fn build_chat_request(session: &Session, request: &ChatRequest) -> ChatCompletionRequest {
    let system = request
        .system_role
        .clone()
        .unwrap_or_else(|| DEFAULT_SYSTEM_ROLE.to_string());

    let mut messages = Vec::with_capacity(request.turns.len() + 1);
    messages.push(Message::system(system));
    messages.extend(request.turns.iter().cloned());

    let images: Vec<&String> = request
        .image_urls
        .iter()
        .filter(|url| url.as_str() != NOT_AVAILABLE_URL)
        .collect();

    if !images.is_empty() {
        if let Some(last_user) = messages.iter_mut().rev().find(|m| m.role == Role::User) {
            for url in images {
                last_user.content.push_image(url.clone());
            }
        } else {
            let mut content = Content::Text(String::new());
            for url in images {
                content.push_image(url.clone());
            }
            messages.push(Message {
                role: Role::User,
                content,
            });
        }
    }

    ChatCompletionRequest {
        model: session.chat_model.clone(),
        messages,
        max_tokens: effective_max_tokens(session, request.max_tokens),
        response_format: request.json_mode.then(ResponseFormat::json_object),
    }
}

/// Build the image payload for an already-final prompt
pub fn build_image_request(
    session: &Session,
    job: &ImageJob,
    prompt: &str,
) -> ToolsResult<ImageGenerationRequest> {
    job.validate()?;

    let (width, height) = effective_image_size(session, job.width, job.height);

    Ok(ImageGenerationRequest {
        model: session.image_model.clone(),
        prompt: prompt.to_string(),
        n: job.count,
        size: format!("{}x{}", width, height),
    })
}

/// Build the speech payload; a missing voice falls back to the session voice
pub fn build_speech_request(session: &Session, text: &str, voice: Option<&str>) -> SpeechRequest {
    SpeechRequest {
        model: SPEECH_MODEL.to_string(),
        input: text.to_string(),
        voice: voice.unwrap_or(&session.voice).to_string(),
    }
}

pub fn build_analysis_request(
    session: &Session,
    image_url: &str,
    instructions: Option<&str>,
) -> ImageAnalysisRequest {
    ImageAnalysisRequest {
        model: session.image_model.clone(),
        image_url: image_url.to_string(),
        request: instructions.map(str::to_string),
    }
}
