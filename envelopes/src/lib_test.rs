use super::*;

#[test]
fn conversation_turn_uses_camel_case_is_user() {
    let turn = ConversationTurn { content: "hi".to_owned(), is_user: true };
    let value = serde_json::to_value(&turn).expect("serialize");
    assert_eq!(value, serde_json::json!({ "content": "hi", "isUser": true }));
}

#[test]
fn chat_request_conversation_defaults_to_empty() {
    let req: ChatRequest = serde_json::from_str(r#"{"message":"hello"}"#).expect("parse");
    assert_eq!(req.message, "hello");
    assert!(req.conversation.is_empty());
}

#[test]
fn chat_reply_now_stamps_parseable_timestamp() {
    let reply = ChatReply::now("ok");
    assert_eq!(reply.response, "ok");
    OffsetDateTime::parse(&reply.timestamp, &Rfc3339).expect("timestamp should be RFC 3339");
}

#[test]
fn error_class_status_and_text() {
    assert_eq!(ErrorClass::Validation.status(), 400);
    assert_eq!(ErrorClass::RateLimited.status(), 429);
    assert_eq!(ErrorClass::Internal.status(), 500);
    assert_eq!(ErrorClass::Validation.message(), VALIDATION_ERROR);
    assert_eq!(ErrorClass::from_status(503), ErrorClass::Internal);
    assert_eq!(ErrorClass::from_status(429), ErrorClass::RateLimited);
}

#[test]
fn decode_reply_accepts_success_body() {
    let body = br#"{"response":"hello","timestamp":"2024-01-01T00:00:00Z"}"#;
    let reply = decode_reply(200, body).expect("decode");
    assert_eq!(reply.response, "hello");
}

#[test]
fn decode_reply_surfaces_error_envelope_text() {
    let body = serde_json::to_vec(&ErrorClass::RateLimited.envelope()).expect("serialize");
    let err = decode_reply(429, &body).expect_err("should fail");
    assert!(matches!(&err, EnvelopeError::Server { status: 429, .. }));
    assert_eq!(err.to_string(), RATE_LIMIT_ERROR);
}

#[test]
fn decode_reply_falls_back_to_class_text_for_opaque_body() {
    let err = decode_reply(502, b"<html>bad gateway</html>").expect_err("should fail");
    assert_eq!(err.to_string(), INTERNAL_ERROR);
}

#[test]
fn decode_reply_rejects_malformed_success_body() {
    let err = decode_reply(200, b"{}").expect_err("should fail");
    assert!(matches!(err, EnvelopeError::Json(_)));
}
