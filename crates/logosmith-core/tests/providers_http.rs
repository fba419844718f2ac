//! Provider client tests against a mock HTTP server.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use logosmith_core::providers::openai::OpenAiClient;
use logosmith_core::providers::replicate::ReplicateClient;
use logosmith_core::providers::{ImageGenerator, TextGenerator};
use logosmith_core::workflow::state::ChatMessage;
use logosmith_core::ServerError;

// ─── OpenAI ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn openai_returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Hello from the model"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let reply = client
        .generate_text(&[ChatMessage::user("hi")])
        .await
        .unwrap();
    assert_eq!(reply, "Hello from the model");
}

#[tokio::test]
async fn openai_non_success_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let err = client
        .generate_text(&[ChatMessage::user("hi")])
        .await
        .unwrap_err();
    match err {
        ServerError::Provider(msg) => assert!(msg.contains("rate limited")),
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn openai_empty_choices_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let err = client
        .generate_text(&[ChatMessage::user("hi")])
        .await
        .unwrap_err();
    assert!(matches!(err, ServerError::Provider(_)));
}

// ─── Replicate ─────────────────────────────────────────────────────────────

fn fast_client(base_url: String) -> ReplicateClient {
    ReplicateClient::new("test-token")
        .with_base_url(base_url)
        .with_polling(Duration::from_millis(1), 5)
}

#[tokio::test]
async fn replicate_submits_then_polls_until_succeeded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "pred-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/predictions/pred-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "succeeded",
            "output": ["https://replicate.delivery/out/logo.png"]
        })))
        .mount(&server)
        .await;

    let client = fast_client(server.uri());
    let image = client
        .generate_image("orbit logo", 1024, 1024, "minimal tech logo")
        .await
        .unwrap();
    assert_eq!(image.image_url, "https://replicate.delivery/out/logo.png");
    assert!(image.model.starts_with("replicate:"));
    assert!(image.prompt.contains("minimal tech logo"));
}

#[tokio::test]
async fn replicate_failed_status_carries_provider_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "pred-2"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/predictions/pred-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "failed",
            "error": "nsfw content detected"
        })))
        .mount(&server)
        .await;

    let client = fast_client(server.uri());
    let err = client
        .generate_image("orbit logo", 1024, 1024, "")
        .await
        .unwrap_err();
    match err {
        ServerError::Provider(msg) => assert!(msg.contains("nsfw content detected")),
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn replicate_times_out_after_poll_cap() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "pred-3"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/predictions/pred-3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "processing"})),
        )
        .expect(5)
        .mount(&server)
        .await;

    let client = fast_client(server.uri());
    let err = client
        .generate_image("orbit logo", 1024, 1024, "")
        .await
        .unwrap_err();
    match err {
        ServerError::Provider(msg) => assert!(msg.contains("timed out")),
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn replicate_rejects_non_created_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(ResponseTemplate::new(402).set_body_string("payment required"))
        .mount(&server)
        .await;

    let client = fast_client(server.uri());
    let err = client
        .generate_image("orbit logo", 1024, 1024, "")
        .await
        .unwrap_err();
    match err {
        ServerError::Provider(msg) => {
            assert!(msg.contains("Failed to start prediction"));
            assert!(msg.contains("payment required"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}
