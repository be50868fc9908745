//! Text normalization shared by header matching and sheet lookup.

/// Normalizes text for comparison: lower-cases and collapses every run of
/// whitespace to a single space, dropping leading and trailing whitespace.
pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
