//! Provider wire types
//!
//! Request and response payloads in the provider's exact field layout.

pub mod request;
pub mod response;
pub mod types;

// Re-export key types for convenience
pub use request::{
    ChatCompletionRequest, ImageAnalysisRequest, ImageGenerationRequest, ResponseFormat,
    SpeechRequest, SPEECH_MODEL,
};
pub use response::{
    ChatCompletion, ChatCompletionResponse, Choice, ChoiceMessage, ImageAnalysisResponse,
    ImageData, ImageGeneration, ImageGenerationResponse, Label, Usage, NOT_AVAILABLE_URL,
};
pub use types::{Content, ContentPart, ImageUrl, Message, Role};
