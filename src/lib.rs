//! AiTools - Strongly-typed client for generative-AI HTTP providers
//!
//! Chat completion, image generation, image analysis and text-to-speech
//! behind one client. Payloads are built from a session snapshot, provider
//! replies are normalized into [`ToolsResult`], structured objects are
//! extracted from free-form text, and multi-step flows (prompt improvement,
//! image fan-out downloads, speech to file or blob) tolerate partial failure
//! where it makes sense.

pub mod analysis;
pub mod api;
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod transport;

pub use crate::api::{ChatCompletion, ImageGeneration, Message, Role, NOT_AVAILABLE_URL};
pub use crate::builder::{ChatRequest, ImageJob, PromptMode};
pub use crate::client::AiTools;
pub use crate::config::Config;
pub use crate::error::{ToolsError, ToolsResult};
pub use crate::extract::ExtractStrategy;
pub use crate::pipeline::{SpeechJob, SpeechOutput, SpeechTarget};
pub use crate::session::{Session, SharedSession};
pub use crate::storage::{HttpBlobStore, ObjectStore};
pub use crate::transport::{HttpTransport, Transport, TransportError};

#[cfg(any(test, feature = "test-utils"))]
pub use crate::storage::InMemoryObjectStore;
