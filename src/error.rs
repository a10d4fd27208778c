//! Error types for AiTools
//!
//! Every operation returns [`ToolsResult`]. The variants follow the failure
//! taxonomy of the provider pipeline: network failures, provider-reported
//! failures (raw body preserved), unparsable success bodies, structured
//! extraction failures and not-available fan-out slots.

use thiserror::Error;

use crate::transport::TransportError;

/// Prefix carried by every transport-level failure message
pub const UNHANDLED_ERROR_PREFIX: &str = "Unhandled Error: ";

/// Library-level errors
#[derive(Debug, Error)]
pub enum ToolsError {
    /// Connection failure, timeout or any other error before a status was received
    #[error("Unhandled Error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx response. `body` is the provider's response text, verbatim.
    #[error("{body}")]
    Provider { status: u16, body: String },

    /// 2xx response whose body did not match the expected shape
    #[error("Failed to deserialize response: {0}")]
    Deserialization(String),

    /// No usable JSON object in a structured-object response
    #[error("Failed to extract JSON object: {0}")]
    Extraction(String),

    /// A fan-out slot whose upstream step did not produce a value
    #[error("Result not available")]
    NotAvailable,

    #[error("No valid response from the API: choice {index} requested, {available} available")]
    ChoiceOutOfRange { index: usize, available: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolsError {
    /// HTTP status reported by the provider, if the failure came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            ToolsError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened below the provider (network, timeout)
    pub fn is_transport(&self) -> bool {
        matches!(self, ToolsError::Transport(_))
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ToolsError::Transport(_) => "transport",
            ToolsError::Provider { .. } => "provider",
            ToolsError::Deserialization(_) => "deserialization",
            ToolsError::Extraction(_) => "extraction",
            ToolsError::NotAvailable => "not_available",
            ToolsError::ChoiceOutOfRange { .. } => "choice_out_of_range",
            ToolsError::InvalidRequest(_) => "invalid_request",
            ToolsError::Storage(_) => "storage",
            ToolsError::Io(_) => "io",
            ToolsError::Json(_) => "json",
        }
    }
}

/// Result type alias for convenience
pub type ToolsResult<T> = Result<T, ToolsError>;
