use super::*;

#[test]
fn split_trims_and_drops_empty_entries() {
    assert_eq!(split_list(" Tuscany, ,Lazio ,, "), vec!["Tuscany".to_owned(), "Lazio".to_owned()]);
}

#[test]
fn split_of_blank_text_is_empty() {
    assert!(split_list("   ").is_empty());
}

#[test]
fn join_uses_comma_space() {
    assert_eq!(join_list(&["Rome".to_owned(), "Florence".to_owned()]), "Rome, Florence");
}

#[test]
fn split_then_join_normalizes_spacing() {
    assert_eq!(join_list(&split_list("Rome,Florence ,  Pisa")), "Rome, Florence, Pisa");
}

#[test]
fn display_uses_placeholder_for_empty_list() {
    assert_eq!(display_list(&[]), "Not specified");
    assert_eq!(display_list(&["Italy".to_owned()]), "Italy");
}
