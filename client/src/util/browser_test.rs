#![cfg(not(feature = "hydrate"))]

use super::*;

#[test]
fn confirm_declines_outside_browser() {
    assert!(!confirm("Delete this trip?"));
}

#[test]
fn origin_is_empty_outside_browser() {
    assert_eq!(origin(), "");
}

#[test]
fn prompt_is_cancelled_outside_browser() {
    assert_eq!(prompt("New name", "beach.jpg"), None);
}
