//! Image analysis and health check integration tests

use aitools::ToolsError;
use bytes::Bytes;
use pretty_assertions::assert_eq;

use crate::common::test_client;
use crate::mocks::{MockProvider, IMAGES_PATH};

#[tokio::test]
async fn test_analyze_image_returns_labels_in_order() {
    let provider = MockProvider::start().await;
    provider.mock_analyze(&["bicycle", "street", "person"]).await;

    let labels = test_client(&provider)
        .analyze_image("https://img.example/bike.png")
        .await
        .unwrap();

    assert_eq!(labels, vec!["bicycle", "street", "person"]);

    let sent = provider
        .received_json(&format!("{}/analyze", IMAGES_PATH))
        .await;
    assert_eq!(sent[0]["image_url"], "https://img.example/bike.png");
    assert!(sent[0].get("request").is_none());
}

#[tokio::test]
async fn test_analyze_local_image() {
    let provider = MockProvider::start().await;
    provider.mock_analyze(&["logo"]).await;

    let labels = test_client(&provider)
        .analyze_local_image(Bytes::from_static(b"\xFF\xD8\xFF\xE0jpeg"))
        .await
        .unwrap();

    assert_eq!(labels, vec!["logo"]);
}

#[tokio::test]
async fn test_analyze_unknown_endpoint_is_provider_failure() {
    let provider = MockProvider::start().await;

    let err = test_client(&provider)
        .analyze_image("https://img.example/x.png")
        .await
        .unwrap_err();

    assert!(matches!(err, ToolsError::Provider { status: 404, .. }));
}

#[tokio::test]
async fn test_health_check_returns_body() {
    let provider = MockProvider::start().await;
    provider.mock_health(200, "OK").await;

    assert_eq!(test_client(&provider).check_api_health().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_health_check_failure() {
    let provider = MockProvider::start().await;
    provider.mock_health(503, "maintenance").await;

    let err = test_client(&provider).check_api_health().await.unwrap_err();
    assert_eq!(err.to_string(), "maintenance");
}
