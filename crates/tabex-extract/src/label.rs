//! Label normalization for table names such as `"LAKHISARAI AC"`.

/// Turns a free-text label into a single capitalized word.
///
/// Trailing tokens equal to `suffix` (case-insensitive) are dropped and the
/// first remaining word is kept, with only its first character upper-cased.
/// A suffix token elsewhere in the label is an ordinary word. Blank or
/// suffix-only input yields `None`.
pub fn normalize_label(label: &str, suffix: &str) -> Option<String> {
    let suffix = suffix.trim();
    let mut tokens: Vec<&str> = label.split_whitespace().collect();
    while !suffix.is_empty()
        && tokens
            .last()
            .is_some_and(|token| token.eq_ignore_ascii_case(suffix))
    {
        tokens.pop();
    }
    let word = tokens.first()?;

    let mut chars = word.chars();
    let first = chars.next()?;
    let mut normalized: String = first.to_uppercase().collect();
    normalized.push_str(&chars.as_str().to_lowercase());
    Some(normalized)
}
