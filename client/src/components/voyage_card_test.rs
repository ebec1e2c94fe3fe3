use super::*;

#[test]
fn full_range_shows_both_dates() {
    let text = date_range_text(NaiveDate::from_ymd_opt(2024, 5, 1), NaiveDate::from_ymd_opt(2024, 5, 12));
    assert_eq!(text, "1 May 2024 → 12 May 2024");
}

#[test]
fn open_end_uses_question_mark() {
    assert_eq!(date_range_text(NaiveDate::from_ymd_opt(2024, 5, 1), None), "1 May 2024 → ?");
}

#[test]
fn missing_dates_have_placeholder() {
    assert_eq!(date_range_text(None, None), "Dates not set");
}
