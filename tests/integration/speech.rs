//! Speech pipeline integration tests
//!
//! - raw bytes
//! - file target (overwrite)
//! - blob target (sanitized name, container ensured, SAS kept out of URL)

use aitools::{SpeechJob, SpeechOutput, ToolsError};
use bytes::Bytes;
use pretty_assertions::assert_eq;

use crate::common::{test_client, test_client_with_blob};
use crate::mocks::{MockBlobService, MockProvider, SPEECH_PATH};

const AUDIO: &[u8] = b"ID3\x04\x00fake-mp3-frames";

#[tokio::test]
async fn test_text_to_speech_returns_audio() {
    let provider = MockProvider::start().await;
    provider.mock_speech(AUDIO).await;

    let audio = test_client(&provider).text_to_speech("Hello").await.unwrap();

    assert_eq!(audio, Bytes::from_static(AUDIO));
    let sent = provider.received_json(SPEECH_PATH).await;
    assert_eq!(sent[0]["model"], "tts-1");
    assert_eq!(sent[0]["input"], "Hello");
    assert_eq!(sent[0]["voice"], "alloy");
}

#[tokio::test]
async fn test_job_voice_overrides_session_voice() {
    let provider = MockProvider::start().await;
    provider.mock_speech(AUDIO).await;

    let tools = test_client(&provider);
    tools.set_voice("shimmer");

    let output = tools
        .synthesize(SpeechJob::new("Hi").with_voice("echo"))
        .await
        .unwrap();
    assert_eq!(output, SpeechOutput::Bytes(Bytes::from_static(AUDIO)));

    tools.text_to_speech("Hi").await.unwrap();

    let sent = provider.received_json(SPEECH_PATH).await;
    assert_eq!(sent[0]["voice"], "echo");
    assert_eq!(sent[1]["voice"], "shimmer");
}

#[tokio::test]
async fn test_speech_to_file_replaces_existing_content() {
    let provider = MockProvider::start().await;
    provider.mock_speech(AUDIO).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greeting.mp3");
    std::fs::write(&path, vec![0u8; 4096]).unwrap();

    test_client(&provider)
        .speech_to_file("Hello", &path, None)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), AUDIO);
}

#[tokio::test]
async fn test_speech_error_body_passes_through() {
    let provider = MockProvider::start().await;
    provider.mock_speech_error(400, "invalid voice").await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.mp3");

    let err = test_client(&provider)
        .speech_to_file("Hello", &path, Some("nobody"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "invalid voice");
    assert!(!path.exists());
}

#[tokio::test]
async fn test_speech_to_blob_uploads_under_sanitized_name() {
    let provider = MockProvider::start().await;
    provider.mock_speech(AUDIO).await;

    let blob = MockBlobService::start().await;
    blob.mock_create_container("podcasts", 201).await;
    blob.mock_upload("podcasts", "Episode-1--Intro-mp3", "audio/mpeg")
        .await;

    let tools = test_client_with_blob(&provider, &blob);
    let url = tools
        .speech_to_blob("Welcome", "podcasts", "Episode 1: Intro.mp3", None)
        .await
        .unwrap();

    assert_eq!(url, format!("{}/podcasts/Episode-1--Intro-mp3", blob.uri()));
    assert!(!url.contains("sig="));
    assert_eq!(
        blob.uploaded_body("podcasts", "Episode-1--Intro-mp3")
            .await
            .unwrap(),
        AUDIO
    );
}

#[tokio::test]
async fn test_existing_container_is_not_an_error() {
    let provider = MockProvider::start().await;
    provider.mock_speech(AUDIO).await;

    let blob = MockBlobService::start().await;
    blob.mock_create_container("audio", 409).await;
    blob.mock_upload("audio", "clip", "audio/mpeg").await;

    let output = test_client_with_blob(&provider, &blob)
        .synthesize(SpeechJob::new("x").to_blob("audio", "clip"))
        .await
        .unwrap();

    assert_eq!(output, SpeechOutput::Blob(format!("{}/audio/clip", blob.uri())));
}

#[tokio::test]
async fn test_upload_failure_is_storage_error() {
    let provider = MockProvider::start().await;
    provider.mock_speech(AUDIO).await;

    let blob = MockBlobService::start().await;
    blob.mock_create_container("audio", 201).await;
    blob.mock_upload_error("audio", "clip", 403).await;

    let err = test_client_with_blob(&provider, &blob)
        .speech_to_blob("x", "audio", "clip", None)
        .await
        .unwrap_err();

    assert!(matches!(err, ToolsError::Storage(_)));
    assert!(err.to_string().contains("AuthorizationFailure"));
}

#[tokio::test]
async fn test_blob_target_without_store_makes_no_calls() {
    let provider = MockProvider::start().await;
    provider.mock_speech(AUDIO).await;

    let err = test_client(&provider)
        .speech_to_blob("x", "audio", "clip", None)
        .await
        .unwrap_err();

    assert!(matches!(err, ToolsError::Storage(_)));
    assert_eq!(provider.request_count(SPEECH_PATH).await, 0);
}
