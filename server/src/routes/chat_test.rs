use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use envelopes::{ChatReply, ErrorEnvelope, INTERNAL_ERROR, RATE_LIMIT_ERROR, VALIDATION_ERROR};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::llm::types::LlmError;
use crate::services::chat::DEMO_MODE_RESPONSE;
use crate::state::AppState;
use crate::state::test_helpers::{MockLlm, MockReply, test_app_state_with_llm};

async fn post_json(state: AppState, body: Value) -> (StatusCode, Vec<u8>) {
    post_raw(state, body.to_string()).await
}

async fn post_raw(state: AppState, body: String) -> (StatusCode, Vec<u8>) {
    let app = crate::routes::app(state);
    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request");
    let resp = app.oneshot(req).await.expect("response");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    (status, bytes.to_vec())
}

fn error_text(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .expect("error envelope")
        .error
}

// =============================================================================
// validation
// =============================================================================

#[tokio::test]
async fn numeric_message_is_400_without_upstream_call() {
    let llm = MockLlm::new(MockReply::Text("unused"));
    let (status, body) = post_json(test_app_state_with_llm(llm.clone()), json!({ "message": 123 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_text(&body), VALIDATION_ERROR);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn empty_object_is_400_without_upstream_call() {
    let llm = MockLlm::new(MockReply::Text("unused"));
    let (status, body) = post_json(test_app_state_with_llm(llm.clone()), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_text(&body), VALIDATION_ERROR);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn non_json_body_is_400() {
    let (status, body) = post_raw(AppState::degraded(), "message=hi".into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_text(&body), VALIDATION_ERROR);
}

#[tokio::test]
async fn validation_precedes_degraded_mode() {
    let (status, _) = post_json(AppState::degraded(), json!({ "message": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// degraded mode
// =============================================================================

#[tokio::test]
async fn degraded_mode_returns_demo_text() {
    let (status, body) = post_json(AppState::degraded(), json!({ "message": "How do I apply?" })).await;
    assert_eq!(status, StatusCode::OK);
    let reply: ChatReply = serde_json::from_slice(&body).expect("reply");
    assert_eq!(reply.response, DEMO_MODE_RESPONSE);
}

#[tokio::test]
async fn degraded_mode_is_deterministic() {
    let (_, first) = post_json(AppState::degraded(), json!({ "message": "hi" })).await;
    let (_, second) = post_json(AppState::degraded(), json!({ "message": "hi" })).await;
    let first: ChatReply = serde_json::from_slice(&first).expect("reply");
    let second: ChatReply = serde_json::from_slice(&second).expect("reply");
    assert_eq!(first.response, second.response);
}

// =============================================================================
// upstream
// =============================================================================

#[tokio::test]
async fn success_returns_reply_envelope() {
    let llm = MockLlm::new(MockReply::Text("Here is how."));
    let (status, body) = post_json(test_app_state_with_llm(llm), json!({ "message": "How do I apply?" })).await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(value["response"], "Here is how.");
    assert!(value["timestamp"].is_string());
}

#[tokio::test]
async fn long_history_is_trimmed_to_twelve_prompt_entries() {
    let llm = MockLlm::new(MockReply::Text("ok"));
    let conversation: Vec<Value> = (0..15)
        .map(|i| json!({ "content": format!("turn {i}"), "isUser": i % 2 == 0 }))
        .collect();
    let (status, _) = post_json(
        test_app_state_with_llm(llm.clone()),
        json!({ "message": "hi", "conversation": conversation }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(llm.last_prompt().len(), 12);
}

#[tokio::test]
async fn rate_limited_upstream_is_429() {
    let llm = MockLlm::new(MockReply::Fail(|| LlmError::ApiRequest("rate limit exceeded".into())));
    let (status, body) = post_json(test_app_state_with_llm(llm), json!({ "message": "hi" })).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(error_text(&body), RATE_LIMIT_ERROR);
}

#[tokio::test]
async fn upstream_failure_is_500_without_details() {
    let llm = MockLlm::new(MockReply::Fail(|| LlmError::ApiResponse {
        status: 401,
        body: "invalid api key gsk_secret".into(),
    }));
    let (status, body) = post_json(test_app_state_with_llm(llm), json!({ "message": "hi" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_text(&body), INTERNAL_ERROR);
    assert!(!String::from_utf8_lossy(&body).contains("gsk_secret"));
}

#[tokio::test]
async fn empty_completion_is_500() {
    let llm = MockLlm::new(MockReply::Empty);
    let (status, body) = post_json(test_app_state_with_llm(llm), json!({ "message": "hi" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_text(&body), INTERNAL_ERROR);
}

#[tokio::test]
async fn repeated_requests_are_independent() {
    let llm = MockLlm::new(MockReply::Text("ok"));
    let state = test_app_state_with_llm(llm.clone());
    let (first, _) = post_json(state.clone(), json!({ "message": "hi" })).await;
    let (second, _) = post_json(state, json!({ "message": "hi" })).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(llm.call_count(), 2);
    let calls = llm.calls.lock().unwrap();
    assert_eq!(calls[0].1, calls[1].1);
}

// =============================================================================
// health
// =============================================================================

#[tokio::test]
async fn healthz_is_ok() {
    let app = crate::routes::app(AppState::degraded());
    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .expect("request");
    let resp = app.oneshot(req).await.expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
}
