//! Chat integration tests
//!
//! Tests for chat completions against the mock provider:
//! - text replies and choice selection
//! - provider, deserialization and transport failures
//! - token budget floor
//! - structured objects and conversations

use aitools::{AiTools, ChatRequest, Message, ToolsError};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::common::{closed_address, constants, test_client, test_config};
use crate::mocks::{chat_completion, MockProvider, CHAT_PATH};

#[tokio::test]
async fn test_chat_text_returns_first_choice() {
    let provider = MockProvider::start().await;
    provider.mock_chat_text("Hello from the mock").await;

    let tools = test_client(&provider);
    let reply = tools.chat_text("Say hello").await.unwrap();

    assert_eq!(reply, "Hello from the mock");

    let sent = provider.received_json(CHAT_PATH).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["model"], constants::TEST_CHAT_MODEL);
    assert_eq!(
        sent[0]["messages"],
        json!([
            {"role": "system", "content": "You are a helpful AI"},
            {"role": "user", "content": "Say hello"}
        ])
    );
    assert!(sent[0].get("response_format").is_none());
    assert!(provider.any_authorized(CHAT_PATH).await);
}

#[tokio::test]
async fn test_chat_text_choice_selects_index() {
    let provider = MockProvider::start().await;
    provider.mock_chat(chat_completion(&["first", "second"])).await;

    let tools = test_client(&provider);

    assert_eq!(tools.chat_text_choice("x", 1).await.unwrap(), "second");
    let err = tools.chat_text_choice("x", 2).await.unwrap_err();
    assert!(matches!(err, ToolsError::ChoiceOutOfRange { index: 2, available: 2 }));
}

#[tokio::test]
async fn test_provider_error_body_passes_through_verbatim() {
    let provider = MockProvider::start().await;
    provider.mock_chat_error(429, "rate limited").await;

    let tools = test_client(&provider);
    let err = tools.chat_prompt("x").await.unwrap_err();

    assert_eq!(err.to_string(), "rate limited");
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn test_malformed_success_is_deserialization_failure() {
    let provider = MockProvider::start().await;
    provider.mock_chat_malformed().await;

    let err = test_client(&provider).chat_prompt("x").await.unwrap_err();

    assert!(matches!(err, ToolsError::Deserialization(_)));
    assert!(err.to_string().starts_with("Failed to deserialize response"));
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_failure() {
    let provider = MockProvider::start().await;
    let config = aitools::Config {
        chat_endpoint: format!("{}/v1/chat/completions", closed_address()),
        ..test_config(&provider)
    };
    let tools = AiTools::from_config(&config).unwrap();

    let err = tools.chat_text("x").await.unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().starts_with("Unhandled Error: "));
}

#[tokio::test]
async fn test_max_tokens_floored_by_session_default() {
    let provider = MockProvider::start().await;
    provider
        .mock_chat_matching(json!({"max_tokens": 500}), "floored")
        .await;

    let tools = test_client(&provider);
    tools.set_default_max_tokens(500);

    let request = ChatRequest::prompt("short please").with_max_tokens(100);
    let completion = tools.chat(&request).await.unwrap();

    assert_eq!(completion.first_text().unwrap(), "floored");
    assert_eq!(completion.total_tokens(), Some(15));
}

#[tokio::test]
async fn test_requested_max_tokens_above_default_is_kept() {
    let provider = MockProvider::start().await;
    provider
        .mock_chat_matching(json!({"max_tokens": 2000}), "long")
        .await;

    let tools = test_client(&provider);
    let request = ChatRequest::prompt("long please").with_max_tokens(2000);

    assert_eq!(tools.chat(&request).await.unwrap().first_text().unwrap(), "long");
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
struct Recipe {
    title: String,
    minutes: u32,
}

#[tokio::test]
async fn test_chat_object_extracts_embedded_json() {
    let provider = MockProvider::start().await;
    provider
        .mock_chat_matching(
            json!({"response_format": {"type": "json_object"}}),
            "Sure! Here it is: {\"title\":\"Pancakes\",\"minutes\":20} Enjoy!",
        )
        .await;

    let recipe: Recipe = test_client(&provider)
        .chat_object("Give me a quick recipe.")
        .await
        .unwrap();

    assert_eq!(
        recipe,
        Recipe {
            title: "Pancakes".to_string(),
            minutes: 20
        }
    );

    let sent = provider.received_json(CHAT_PATH).await;
    let prompt = sent[0]["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.ends_with(r#"{"title":"","minutes":0}"#));
}

#[tokio::test]
async fn test_chat_object_without_json_is_extraction_failure() {
    let provider = MockProvider::start().await;
    provider.mock_chat_text("I'd rather not.").await;

    let err = test_client(&provider)
        .chat_object::<Recipe>("Give me a recipe.")
        .await
        .unwrap_err();

    assert!(matches!(err, ToolsError::Extraction(_)));
}

#[tokio::test]
async fn test_continue_conversation_keeps_turn_order() {
    let provider = MockProvider::start().await;
    provider.mock_chat_text("Paris, again.").await;

    let completion = test_client(&provider)
        .continue_conversation(vec![
            Message::user("Capital of France?"),
            Message::assistant("Paris."),
            Message::user("And again?"),
        ])
        .await
        .unwrap();

    assert_eq!(completion.first_text().unwrap(), "Paris, again.");

    let sent = provider.received_json(CHAT_PATH).await;
    let roles: Vec<&str> = sent[0]["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
}

#[tokio::test]
async fn test_multiple_chat_responses_are_sequential_calls() {
    let provider = MockProvider::start().await;
    provider.mock_chat_text("again").await;

    let responses = test_client(&provider)
        .multiple_chat_responses("Repeat", 3)
        .await;

    assert_eq!(responses, vec!["again", "again", "again"]);
    assert_eq!(provider.request_count(CHAT_PATH).await, 3);
}

#[tokio::test]
async fn test_setter_is_seen_by_next_call() {
    let provider = MockProvider::start().await;
    provider.mock_chat_text("ok").await;

    let tools = test_client(&provider);
    tools.set_chat_model("gpt-other");
    tools.chat_text("x").await.unwrap();

    let sent = provider.received_json(CHAT_PATH).await;
    assert_eq!(sent[0]["model"], "gpt-other");
}
