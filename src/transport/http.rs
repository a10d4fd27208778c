//! reqwest-backed transport

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, instrument};

use super::provider::{Transport, TransportError, TransportRequest, TransportResponse};

/// HTTP transport over a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Wrap an existing client
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a pooled client with the given per-request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(16)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Underlying pooled client, for collaborators that share the pool
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "Failed to send request");
            TransportError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!(status = %status, error = %e, "Failed to read response body");
            TransportError::from(e)
        })?;

        debug!(status = %status, body_len = body.len(), "Response received");
        Ok(TransportResponse { status, body })
    }
}
