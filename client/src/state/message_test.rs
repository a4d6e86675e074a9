use super::*;

#[test]
fn user_message_is_settled() {
    let msg = ChatMessage::user("hello");
    assert_eq!(msg.origin, Origin::User);
    assert_eq!(msg.content(), "hello");
    assert!(!msg.is_pending());
    assert!(msg.is_user());
}

#[test]
fn pending_message_has_empty_content() {
    let msg = ChatMessage::pending();
    assert_eq!(msg.origin, Origin::Assistant);
    assert!(msg.is_pending());
    assert_eq!(msg.content(), "");
}

#[test]
fn ids_are_unique() {
    let a = ChatMessage::pending();
    let b = ChatMessage::pending();
    assert_ne!(a.id, b.id);
}

#[test]
fn settle_replaces_placeholder_once() {
    let mut msg = ChatMessage::pending();
    let id = msg.id;
    let created_at = msg.created_at;
    assert!(msg.settle("reply".into()));
    assert_eq!(msg.state, MessageState::Settled("reply".into()));
    assert_eq!(msg.id, id);
    assert_eq!(msg.created_at, created_at);
    assert!(!msg.settle("again".into()));
    assert_eq!(msg.content(), "reply");
}

#[test]
fn failed_message_embeds_error() {
    let msg = ChatMessage::failed("Too many requests");
    assert!(msg.is_failed());
    assert!(!msg.is_pending());
    assert_eq!(msg.content(), "Sorry, I encountered an error: Too many requests. Please try again.");
}

#[test]
fn to_turn_maps_origin() {
    assert_eq!(ChatMessage::user("q").to_turn(), ConversationTurn { content: "q".into(), is_user: true });
    assert_eq!(ChatMessage::assistant("a").to_turn(), ConversationTurn { content: "a".into(), is_user: false });
}
