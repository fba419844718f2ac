//! HTTP surface tests using the router directly with scripted providers.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use logosmith_core::providers::fake::{ScriptedText, StubImages};
use logosmith_core::providers::SimulatedAssessor;
use logosmith_core::state::{AppState, AppStateInner};
use logosmith_core::workflow::engine::WorkflowEngine;
use logosmith_server::app;

fn test_state(text: ScriptedText) -> AppState {
    let engine = WorkflowEngine::new(
        Arc::new(text),
        Arc::new(StubImages::ok()),
        Arc::new(SimulatedAssessor::passing()),
    )
    .with_image_log(None);
    Arc::new(AppStateInner::new(engine))
}

async fn body_json(body: Body) -> serde_json::Value {
    let bytes = to_bytes(body, usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app(test_state(ScriptedText::new()), None);
    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn tech_logo_creates_a_session_with_greeting() {
    let app = app(test_state(ScriptedText::new()), None);
    let response = app
        .oneshot(Request::get("/tech_logo").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert!(!json["session_id"].as_str().unwrap().is_empty());
    assert!(json["message"].as_str().unwrap().contains("Alex"));
}

#[tokio::test]
async fn chat_with_unknown_session_is_404() {
    let app = app(test_state(ScriptedText::new()), None);
    let request = Request::post("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({"session_id": "does-not-exist", "message": "hi"}).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"], "Session not found");
}

#[tokio::test]
async fn chat_returns_conversation_and_current_step() {
    let state = test_state(ScriptedText::with_replies([
        "Great to meet you! What style are you imagining?",
    ]));
    let router = app(state.clone(), None);

    let response = router
        .clone()
        .oneshot(Request::get("/tech_logo").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let session = body_json(response.into_body()).await;
    let session_id = session["session_id"].as_str().unwrap().to_string();

    let request = Request::post("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({
                "session_id": session_id,
                "message": "My company is Acme, a fintech startup for developers"
            })
            .to_string(),
        ))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["current_step"], "chat");
    let conversation = json["conversation"].as_array().unwrap();
    // greeting + user message + assistant reply
    assert_eq!(conversation.len(), 3);
    assert_eq!(conversation[1]["role"], "user");
    assert_eq!(conversation[2]["role"], "assistant");
}

#[tokio::test]
async fn root_serves_placeholder_without_static_dir() {
    let app = app(test_state(ScriptedText::new()), None);
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
