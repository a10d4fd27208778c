//! Request logging utilities for provider calls
//!
//! Provides structured logging with correlation IDs for tracing one provider
//! call from payload build to normalized result.

use std::time::Instant;
use tracing::{debug, info, warn, Span};
use uuid::Uuid;

use crate::error::ToolsError;

/// Context for tracking a provider call
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this call (for log correlation)
    pub trace_id: String,
    /// When the call started
    pub start_time: Instant,
    /// Logical endpoint (`chat`, `images`, `speech`, `analyze`, `download`, ...)
    pub endpoint: String,
    /// Model being used (if applicable)
    pub model: Option<String>,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(endpoint: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            endpoint: endpoint.to_string(),
            model: None,
        }
    }

    /// Set the model for this call
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Log request being sent to the provider
    pub fn log_upstream_request(&self, url: &str, body_size: Option<usize>) {
        debug!(
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            model = ?self.model,
            url = %url,
            body_size = ?body_size,
            "Sending request to provider"
        );
    }

    /// Log response received from the provider
    pub fn log_upstream_response(&self, status: u16, body_size: usize) {
        debug!(
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            status = %status,
            body_size = %body_size,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from provider"
        );
    }

    /// Log successful completion
    pub fn log_request_complete(&self, tokens: Option<u32>) {
        info!(
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            model = ?self.model,
            tokens = ?tokens,
            elapsed_ms = %self.elapsed_ms(),
            "Provider call completed"
        );
    }

    /// Log a failed call
    pub fn log_failure(&self, error: &ToolsError) {
        warn!(
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            model = ?self.model,
            kind = error.kind(),
            status = ?error.status(),
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Provider call failed"
        );
    }

    /// Create a tracing span for this call
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "provider_call",
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            model = ?self.model,
        )
    }
}
