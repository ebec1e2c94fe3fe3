//! Comma-separated editing of list columns (regions, countries, cities).

#[cfg(test)]
#[path = "text_list_test.rs"]
mod text_list_test;

/// Split form text into trimmed, non-empty entries.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Render a list column for display or for a text input.
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

/// Like [`join_list`], with a placeholder for empty lists.
pub fn display_list(items: &[String]) -> String {
    if items.is_empty() { "Not specified".to_owned() } else { join_list(items) }
}
