use super::*;

fn sample() -> GestureCollection {
    GestureCollection::new(vec![
        Gesture::new("swipe-up", "↑", "print(1)"),
        Gesture::new("back", "← ↑", "go_back()"),
        Gesture::new("close", "↓ →", "close()"),
    ])
}

#[test]
fn collection_is_sorted_by_name() {
    let gestures = sample();
    let names: Vec<&str> = gestures.names().collect();
    assert_eq!(names, vec!["back", "close", "swipe-up"]);
}

#[test]
fn lookup_is_case_sensitive() {
    let gestures = sample();
    assert!(gestures.contains("back"));
    assert!(!gestures.contains("Back"));
    assert_eq!(gestures.get("close").map(|g| g.action.as_str()), Some("close()"));
}

#[test]
fn name_availability_honours_own_name() {
    let gestures = sample();
    assert_eq!(
        gestures.ensure_name_available("back", None),
        Err(ValidationError::DuplicateName("back".to_string()))
    );
    assert_eq!(gestures.ensure_name_available("back", Some("back")), Ok(()));
    assert_eq!(
        gestures.ensure_name_available("close", Some("back")),
        Err(ValidationError::DuplicateName("close".to_string()))
    );
    assert_eq!(gestures.ensure_name_available("fresh", None), Ok(()));
}

#[test]
fn find_by_directions_normalises_input() {
    let gestures = sample();
    assert_eq!(
        gestures.find_by_directions("左  上").map(|g| g.name.as_str()),
        Some("back")
    );
    assert!(gestures.find_by_directions("↗").is_none());
    assert!(gestures.find_by_directions("").is_none());
}

#[test]
fn name_shape_rules() {
    assert_eq!(validate_name(""), Err(ValidationError::EmptyName));
    assert_eq!(validate_name("  "), Err(ValidationError::EmptyName));
    assert_eq!(validate_name(&"a".repeat(20)), Ok(()));
    assert_eq!(
        validate_name(&"a".repeat(21)),
        Err(ValidationError::NameTooLong { max: 20 })
    );
    // Counted in characters, not bytes.
    assert_eq!(validate_name(&"手".repeat(20)), Ok(()));
}
