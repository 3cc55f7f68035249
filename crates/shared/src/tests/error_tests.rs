use super::*;

#[test]
fn rejection_keywords_take_priority() {
    assert!(matches!(
        GestureError::from_rejection(Operation::Update, Some("not found".into())),
        GestureError::NotFound(m) if m == "not found"
    ));
    assert!(matches!(
        GestureError::from_rejection(Operation::Update, Some("手势已存在".into())),
        GestureError::Conflict(_)
    ));
    assert!(matches!(
        GestureError::from_rejection(Operation::Delete, Some("Gesture already exists".into())),
        GestureError::Conflict(_)
    ));
}

#[test]
fn rejection_falls_back_per_operation() {
    assert!(matches!(
        GestureError::from_rejection(Operation::Add, Some("nope".into())),
        GestureError::Conflict(_)
    ));
    assert!(matches!(
        GestureError::from_rejection(Operation::Delete, Some("nope".into())),
        GestureError::NotFound(_)
    ));
    assert!(matches!(
        GestureError::from_rejection(Operation::Update, Some("nope".into())),
        GestureError::Rejected(_)
    ));
}

#[test]
fn server_message_is_displayed_verbatim() {
    let err = GestureError::from_rejection(Operation::Delete, Some("not found".into()));
    assert_eq!(err.to_string(), "not found");
    let err = GestureError::from_rejection(Operation::Add, None);
    assert_eq!(err.to_string(), "add was rejected by the server");
}
