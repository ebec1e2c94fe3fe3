use super::*;

#[test]
fn bearer_formats_authorization_header() {
    assert_eq!(bearer("tok"), "Bearer tok");
}

#[test]
fn parse_body_treats_empty_as_null() {
    let value: Option<u32> = parse_body("  ").unwrap();
    assert_eq!(value, None);
}

#[test]
fn parse_body_reports_decode_errors() {
    let result: Result<Vec<u32>, _> = parse_body("{\"not\":\"a list\"}");
    assert!(matches!(result, Err(BackendError::Decode(_))));
}
