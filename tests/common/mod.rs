//! Common test utilities for AiTools
//!
//! Builds clients wired to the mock servers.

#![allow(dead_code)]

use aitools::{AiTools, Config};

use crate::mocks::{MockBlobService, MockProvider};

/// Test configuration constants
pub mod constants {
    /// API key sent to the mock provider
    pub const TEST_API_KEY: &str = "test-openai-api-key";
    /// Model ids configured for tests
    pub const TEST_CHAT_MODEL: &str = "gpt-test";
    pub const TEST_IMAGE_MODEL: &str = "image-test";
}

/// Configuration pointing every endpoint at the mock provider
pub fn test_config(provider: &MockProvider) -> Config {
    Config {
        api_key: constants::TEST_API_KEY.to_string(),
        chat_endpoint: provider.chat_endpoint(),
        image_endpoint: provider.image_endpoint(),
        speech_endpoint: provider.speech_endpoint(),
        chat_model: constants::TEST_CHAT_MODEL.to_string(),
        image_model: constants::TEST_IMAGE_MODEL.to_string(),
        http_timeout_seconds: 5,
        ..Config::default()
    }
}

/// Client against the mock provider, no object store
pub fn test_client(provider: &MockProvider) -> AiTools {
    AiTools::from_config(&test_config(provider)).unwrap()
}

/// Client against the mock provider and the mock blob service
pub fn test_client_with_blob(provider: &MockProvider, blob: &MockBlobService) -> AiTools {
    let config = Config {
        blob_service_url: Some(blob.uri()),
        blob_sas_token: Some("sv=2021&sig=test".to_string()),
        ..test_config(provider)
    };
    AiTools::from_config(&config).unwrap()
}

/// An address nothing is listening on
pub fn closed_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
