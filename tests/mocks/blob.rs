//! Mock blob service for testing
//!
//! Provides wiremock-based mocks for:
//! - PUT /{container}?restype=container - Create container
//! - PUT /{container}/{name} - Upload block blob

#![allow(dead_code)]

use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Mock blob service wrapper
pub struct MockBlobService {
    server: MockServer,
}

impl MockBlobService {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Container create answers `status` (201 created, 409 already exists)
    pub async fn mock_create_container(&self, container: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/{}", container)))
            .and(query_param("restype", "container"))
            .and(header("x-ms-blob-public-access", "blob"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Block blob upload with the given content type
    pub async fn mock_upload(&self, container: &str, name: &str, content_type: &str) {
        Mock::given(method("PUT"))
            .and(path(format!("/{}/{}", container, name)))
            .and(header("x-ms-blob-type", "BlockBlob"))
            .and(header("Content-Type", content_type))
            .and(query_param("sig", "test"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_upload_error(&self, container: &str, name: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/{}/{}", container, name)))
            .respond_with(ResponseTemplate::new(status).set_body_string("AuthorizationFailure"))
            .mount(&self.server)
            .await;
    }

    /// Uploaded body for `container/name`, if any
    pub async fn uploaded_body(&self, container: &str, name: &str) -> Option<Vec<u8>> {
        let target = format!("/{}/{}", container, name);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .find(|r| r.url.path() == target)
            .map(|r| r.body)
    }
}
