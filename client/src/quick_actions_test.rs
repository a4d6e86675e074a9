use super::*;

#[test]
fn ids_are_unique() {
    for (i, a) in QUICK_ACTIONS.iter().enumerate() {
        assert!(QUICK_ACTIONS[i + 1..].iter().all(|b| b.id != a.id), "duplicate id {}", a.id);
    }
}

#[test]
fn find_by_id() {
    let action = find("essay-help").expect("action");
    assert_eq!(action.label, "Essay Writing");
    assert!(find("missing").is_none());
}

#[test]
fn messages_are_not_blank() {
    assert!(QUICK_ACTIONS.iter().all(|a| !a.message.trim().is_empty()));
}
