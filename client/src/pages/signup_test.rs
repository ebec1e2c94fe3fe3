use super::*;

#[test]
fn immediate_session_goes_to_trip_list() {
    assert_eq!(signup_next_step(SignUpOutcome::SignedIn), Ok("/voyages"));
}

#[test]
fn confirmation_keeps_user_on_page_with_notice() {
    assert!(signup_next_step(SignUpOutcome::ConfirmationSent).is_err());
}

#[test]
fn passwords_must_match() {
    assert_eq!(passwords_match("abc123!", "abc123!"), Ok(()));
    assert_eq!(passwords_match("abc123!", "abc123?"), Err("Passwords do not match."));
}
