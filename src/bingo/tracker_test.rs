use super::*;
use time::Duration;
use time::macros::datetime;

const T0: OffsetDateTime = datetime!(2026-08-21 14:00:00 UTC);

// =============================================================================
// validate_position
// =============================================================================

#[test]
fn validate_position_accepts_grid_bounds() {
    assert_eq!(validate_position(0).unwrap(), 0);
    assert_eq!(validate_position(24).unwrap(), 24);
}

#[test]
fn validate_position_rejects_negative() {
    let err = validate_position(-1).unwrap_err();
    assert!(matches!(err, BingoError::InvalidPosition(-1)));
    assert!(err.is_invalid_argument());
}

#[test]
fn validate_position_rejects_twenty_five() {
    assert!(matches!(validate_position(25), Err(BingoError::InvalidPosition(25))));
    assert!(matches!(validate_position(i64::MAX), Err(BingoError::InvalidPosition(i64::MAX))));
}

// =============================================================================
// toggle
// =============================================================================

#[test]
fn toggle_flips_membership() {
    let mut state = PersonBoardState::new(1);
    let first = state.toggle(6, T0);
    assert!(first.checked);
    assert!(state.checked.contains(&6));

    let second = state.toggle(6, T0);
    assert!(!second.checked);
    assert!(state.checked.is_empty());
}

#[test]
fn toggle_stamps_completion_on_first_line() {
    let mut state = PersonBoardState::new(1);
    for p in 0..4 {
        let outcome = state.toggle(p, T0);
        assert!(!outcome.newly_completed);
    }
    assert!(state.completed_at.is_none());

    let at = T0 + Duration::minutes(3);
    let outcome = state.toggle(4, at);
    assert!(outcome.newly_completed);
    assert_eq!(state.completed_at, Some(at));
}

#[test]
fn completion_survives_second_line_and_unchecks() {
    let mut state = PersonBoardState::new(1);
    for p in [0, 1, 2, 3, 4] {
        state.toggle(p, T0);
    }
    assert_eq!(state.completed_at, Some(T0));

    let later = T0 + Duration::hours(1);
    for p in [5, 10, 15, 20] {
        let outcome = state.toggle(p, later);
        assert!(!outcome.newly_completed);
    }
    assert!(state.winning_positions().contains(&20));
    assert_eq!(state.completed_at, Some(T0));

    state.toggle(0, later);
    state.toggle(2, later);
    assert!(!state.has_bingo());
    assert_eq!(state.completed_at, Some(T0));
}

#[test]
fn recompleting_after_uncheck_does_not_restamp() {
    let mut state = PersonBoardState::new(1);
    for p in [4, 8, 12, 16, 20] {
        state.toggle(p, T0);
    }
    state.toggle(12, T0 + Duration::seconds(10));
    let outcome = state.toggle(12, T0 + Duration::seconds(20));
    assert!(!outcome.newly_completed);
    assert_eq!(state.completed_at, Some(T0));
}

// =============================================================================
// claim_completion / clear_checks
// =============================================================================

#[test]
fn claim_completion_records_once() {
    let mut state = PersonBoardState::new(3);
    assert_eq!(state.claim_completion(T0), CompletionClaim::Recorded(T0));
    let later = T0 + Duration::minutes(1);
    assert_eq!(state.claim_completion(later), CompletionClaim::AlreadyCompleted(T0));
    assert_eq!(state.claim_completion(later).completed_at(), T0);
}

#[test]
fn clear_checks_keeps_completion() {
    let mut state = PersonBoardState::new(3);
    for p in [0, 5, 10, 15, 20] {
        state.toggle(p, T0);
    }
    state.clear_checks();
    assert!(state.checked.is_empty());
    assert_eq!(state.completed_at, Some(T0));
}

// =============================================================================
// codec
// =============================================================================

#[test]
fn encode_checked_is_sorted_array() {
    let checked: CheckedSet = [12, 0, 3].into_iter().collect();
    assert_eq!(encode_checked(&checked), serde_json::json!([0, 3, 12]));
}

#[test]
fn decode_checked_reads_array_form() {
    let decoded = decode_checked(&serde_json::json!([4, 1, 1, 30]));
    assert_eq!(decoded, [1, 4].into_iter().collect::<CheckedSet>());
}

#[test]
fn decode_checked_reads_legacy_map_form() {
    let decoded = decode_checked(&serde_json::json!({"0": true, "3": false, "7": true, "x": true}));
    assert_eq!(decoded, [0, 7].into_iter().collect::<CheckedSet>());
}

#[test]
fn decode_checked_garbage_is_empty() {
    assert!(decode_checked(&serde_json::json!("nope")).is_empty());
    assert!(decode_checked(&serde_json::Value::Null).is_empty());
}

#[test]
fn state_serializes_completion_as_rfc3339() {
    let mut state = PersonBoardState::new(9);
    state.claim_completion(T0);
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["completed_at"], "2026-08-21T14:00:00Z");
    assert_eq!(json["checked"], serde_json::json!([]));
}
