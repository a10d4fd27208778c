//! Transport abstraction
//!
//! The core never talks to an HTTP library directly. Every provider call,
//! download and analysis upload goes through a [`Transport`], which only
//! reports what came back: a status and the raw body, or a failure to get
//! any response at all.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Failure to obtain any response (connect error, timeout, broken body)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// One outbound request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl TransportRequest {
    /// GET without any headers (used for asset downloads)
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// POST with a JSON body
    pub fn post_json(url: impl Into<String>, mut headers: HeaderMap, body: Vec<u8>) -> Self {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            method: Method::POST,
            url: url.into(),
            headers,
            body: Some(Bytes::from(body)),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn body_len(&self) -> Option<usize> {
        self.body.as_ref().map(Bytes::len)
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Trait defining the interface to the HTTP capability
///
/// Implementations must not turn non-2xx statuses into errors; the response
/// normalizer owns that decision. Connection pooling is the implementation's
/// concern.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Send a request and return whatever the server answered
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
