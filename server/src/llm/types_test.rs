use super::*;

#[test]
fn status_429_is_rate_limited() {
    let err = LlmError::ApiResponse { status: 429, body: String::new() };
    assert!(err.is_rate_limited());
}

#[test]
fn rate_limit_text_in_body_is_rate_limited() {
    let err = LlmError::ApiResponse {
        status: 400,
        body: r#"{"error":{"message":"Rate limit reached for model"}}"#.into(),
    };
    assert!(err.is_rate_limited());
}

#[test]
fn rate_limit_code_in_body_is_rate_limited() {
    let err = LlmError::ApiResponse { status: 503, body: r#"{"error":{"code":"rate_limit_exceeded"}}"#.into() };
    assert!(err.is_rate_limited());
}

#[test]
fn rate_limit_text_in_request_error_is_rate_limited() {
    let err = LlmError::ApiRequest("upstream says: rate limit exceeded".into());
    assert!(err.is_rate_limited());
}

#[test]
fn plain_server_error_is_not_rate_limited() {
    let err = LlmError::ApiResponse { status: 500, body: "internal".into() };
    assert!(!err.is_rate_limited());
    assert!(!LlmError::ApiParse("eof".into()).is_rate_limited());
}

#[test]
fn unconfigured_errors() {
    assert!(LlmError::MissingApiKey { var: "GROQ_API_KEY".into() }.is_unconfigured());
    assert!(LlmError::PlaceholderApiKey { var: "GROQ_API_KEY".into() }.is_unconfigured());
    assert!(!LlmError::ApiRequest("x".into()).is_unconfigured());
}

#[test]
fn role_serializes_lowercase() {
    let msg = PromptMessage::assistant("hi");
    let value = serde_json::to_value(&msg).expect("serialize");
    assert_eq!(value, serde_json::json!({ "role": "assistant", "content": "hi" }));
}

#[test]
fn prompt_message_constructors_set_roles() {
    assert_eq!(PromptMessage::system("s").role, Role::System);
    assert_eq!(PromptMessage::user("u").role, Role::User);
    assert_eq!(PromptMessage::assistant("a").role, Role::Assistant);
}
