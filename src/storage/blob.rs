//! Blob service client
//!
//! REST client for an Azure-Blob-style service: containers are created with
//! `PUT {base}/{container}?restype=container`, block blobs are uploaded with
//! `PUT {base}/{container}/{name}`. An optional SAS token authorizes every
//! request and is never part of the returned URL.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, error, instrument};

use super::{validate_container_name, ObjectStore};
use crate::error::{ToolsError, ToolsResult};

const BLOB_API_VERSION: &str = "2021-08-06";

/// Blob service client
pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
    sas_token: Option<String>,
}

impl HttpBlobStore {
    /// Create a new blob store client
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sas_token: None,
        }
    }

    /// Authorize requests with a shared access signature
    pub fn with_sas_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim_start_matches('?');
        self.sas_token = (!token.is_empty()).then(|| token.to_string());
        self
    }

    /// Public URL of an object (no credentials)
    pub fn object_url(&self, container: &str, object_name: &str) -> String {
        format!("{}/{}/{}", self.base_url, container, object_name)
    }

    fn authorize(&self, url: String, has_query: bool) -> String {
        match &self.sas_token {
            Some(token) if has_query => format!("{}&{}", url, token),
            Some(token) => format!("{}?{}", url, token),
            None => url,
        }
    }

    fn version_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-ms-version", HeaderValue::from_static(BLOB_API_VERSION));
        headers
    }
}

#[async_trait]
impl ObjectStore for HttpBlobStore {
    fn name(&self) -> &'static str {
        "blob"
    }

    #[instrument(skip(self), fields(container = %container))]
    async fn ensure_container(&self, container: &str) -> ToolsResult<()> {
        validate_container_name(container)?;
        let url = self.authorize(
            format!("{}/{}?restype=container", self.base_url, container),
            true,
        );

        let mut headers = Self::version_headers();
        headers.insert("x-ms-blob-public-access", HeaderValue::from_static("blob"));

        let response = self
            .client
            .put(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ToolsError::Storage(e.to_string()))?;

        let status = response.status();
        debug!(status = %status, "Container create response");

        // 409 means the container already exists
        if status.is_success() || status == StatusCode::CONFLICT {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        error!(status = %status, body = %text, "Container create failed");
        Err(ToolsError::Storage(format!(
            "container create failed {}: {}",
            status, text
        )))
    }

    #[instrument(skip(self, data), fields(container = %container, object_name = %object_name, size = data.len()))]
    async fn upload(
        &self,
        container: &str,
        object_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> ToolsResult<String> {
        validate_container_name(container)?;
        let public_url = self.object_url(container, object_name);
        let url = self.authorize(public_url.clone(), false);

        let mut headers = Self::version_headers();
        headers.insert("x-ms-blob-type", HeaderValue::from_static("BlockBlob"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type)
                .map_err(|e| ToolsError::InvalidRequest(e.to_string()))?,
        );

        let response = self
            .client
            .put(&url)
            .headers(headers)
            .body(data)
            .send()
            .await
            .map_err(|e| ToolsError::Storage(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, "Blob upload failed");
            return Err(ToolsError::Storage(format!(
                "blob upload failed {}: {}",
                status, text
            )));
        }

        debug!(url = %public_url, "Blob uploaded");
        Ok(public_url)
    }
}
