//! Form-field parsing and column decoding shared by the services.

#[cfg(test)]
#[path = "fields_test.rs"]
mod fields_test;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Decode a nullable array column as an empty list when null.
///
/// # Errors
///
/// Fails when the column is neither null nor an array of strings.
pub fn nullable_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Trimmed text, or `None` when blank.
pub fn optional_text(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

/// Parse an optional non-negative amount.
///
/// # Errors
///
/// Returns `message` when the text is not a finite number `>= 0`.
pub fn parse_amount(text: &str, message: &'static str) -> Result<Option<f64>, &'static str> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(message),
    }
}

/// Parse an optional `YYYY-MM-DD` date as produced by `<input type="date">`.
///
/// # Errors
///
/// Returns `message` when the text is not a calendar date.
pub fn parse_date(text: &str, message: &'static str) -> Result<Option<NaiveDate>, &'static str> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map(Some).map_err(|_| message)
}

/// Text for an amount input: empty when absent, no trailing `.0`.
pub fn amount_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn date_text(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Amount for display, with a placeholder when absent.
pub fn display_amount(value: Option<f64>) -> String {
    value.map_or_else(|| "Not specified".to_owned(), |v| format!("{v:.2} €"))
}
