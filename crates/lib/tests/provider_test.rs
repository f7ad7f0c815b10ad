//! # Provider Adapter Tests
//!
//! Exercises the Claude and DeepSeek adapters against a `wiremock` server standing
//! in for the hosted APIs.

mod common;

use bystander::{
    providers::{
        ai::{claude::ClaudeProvider, deepseek::DeepSeekProvider, AiProvider, CompletionRequest},
        factory::{create_provider, ProviderKind},
    },
    ProviderError,
};
use common::{claude_body, deepseek_body, setup_tracing};
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn request(prompt: &str) -> CompletionRequest {
    CompletionRequest {
        system_instruction: Some("คุณคือผู้ช่วยปฐมพยาบาล".to_string()),
        user_prompt: prompt.to_string(),
        model_id: "test-model".to_string(),
        max_output_tokens: 1024,
        temperature: 0.6,
    }
}

async fn claude_against(server: &MockServer) -> ClaudeProvider {
    ClaudeProvider::new(
        format!("{}/v1/messages", server.uri()),
        Some("test-key".to_string()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_claude_success_returns_text_and_usage() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 1024,
            "system": "คุณคือผู้ช่วยปฐมพยาบาล",
            "messages": [{"role": "user", "content": "มีคนหมดสติ"}]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(claude_body("  1. โทร 1669\n", 42, 17)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = claude_against(&server).await;
    let completion = provider.complete(&request("มีคนหมดสติ")).await.unwrap();

    assert_eq!(completion.text, "1. โทร 1669");
    assert_eq!(completion.input_tokens, 42);
    assert_eq!(completion.output_tokens, 17);
}

#[tokio::test]
async fn test_claude_rate_limit() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate_limit_error"))
        .mount(&server)
        .await;

    let err = claude_against(&server)
        .await
        .complete(&request("help"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited(ref body) if body == "rate_limit_error"));
    assert!(err.user_message("help").contains("1669"));
}

#[tokio::test]
async fn test_claude_server_error_status() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = claude_against(&server)
        .await
        .complete(&request("help"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Status { code: 500, .. }));
    let message = err.user_message("help");
    assert!(message.contains("500"));
    assert!(message.contains("1669"));
}

#[tokio::test]
async fn test_claude_reply_without_text_block() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [],
            "usage": {"input_tokens": 5, "output_tokens": 0}
        })))
        .mount(&server)
        .await;

    let err = claude_against(&server)
        .await
        .complete(&request("help"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::UnexpectedStructure));
}

#[tokio::test]
async fn test_connection_failure_is_classified() {
    setup_tracing();
    // Nothing listens on port 1.
    let provider = ClaudeProvider::new(
        "http://127.0.0.1:1/v1/messages".to_string(),
        Some("test-key".to_string()),
    )
    .unwrap();

    let err = provider.complete(&request("help")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Connection(_)), "got {err:?}");
    assert!(err.user_message("help").contains("1669"));
}

/// A provider without a key never reaches the network.
#[tokio::test]
async fn test_disabled_provider_makes_no_request() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(claude_body("unused", 1, 1)))
        .expect(0)
        .mount(&server)
        .await;

    for kind in [ProviderKind::Claude, ProviderKind::DeepSeek] {
        let provider = create_provider(kind, Some(server.uri()), None).unwrap();
        assert!(!provider.is_enabled());

        let prompt = "มีคนอาหารติดคออยู่ใกล้ฉัน";
        let err = provider.complete(&request(prompt)).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));

        let message = err.user_message(prompt);
        assert!(message.contains("1669"));
        assert!(message.contains("Heimlich"));
    }
}

#[tokio::test]
async fn test_disabled_message_without_choking_keyword() {
    let provider = create_provider(ProviderKind::Claude, None, Some("   ".to_string())).unwrap();
    let err = provider.complete(&request("ไฟไหม้")).await.unwrap_err();
    let message = err.user_message("ไฟไหม้");
    assert!(message.contains("1669"));
    assert!(!message.contains("Heimlich"));
}

#[tokio::test]
async fn test_deepseek_strips_emphasis_and_sends_system_message() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer ds-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": false,
            "messages": [
                {"role": "system", "content": "คุณคือผู้ช่วยปฐมพยาบาล"},
                {"role": "user", "content": "มีคนเลือดออกมาก"}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(deepseek_body("**1.** กดห้ามเลือด\n*2.* โทร 1669")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = DeepSeekProvider::new(
        format!("{}/chat/completions", server.uri()),
        Some("ds-key".to_string()),
    )
    .unwrap();
    let completion = provider
        .complete(&request("มีคนเลือดออกมาก"))
        .await
        .unwrap();

    assert_eq!(completion.text, "1. กดห้ามเลือด\n2. โทร 1669");
    assert!(!completion.text.contains('*'));
    assert_eq!(completion.input_tokens, 12);
    assert_eq!(completion.output_tokens, 34);
}

#[tokio::test]
async fn test_deepseek_reply_without_choices() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = DeepSeekProvider::new(server.uri(), Some("ds-key".to_string())).unwrap();
    let err = provider.complete(&request("help")).await.unwrap_err();
    assert!(matches!(err, ProviderError::UnexpectedStructure));
}
