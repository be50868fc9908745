//! Table name resolution.

use tabex_model::normalize_text;

/// Finds the sheet matching `wanted` among `available` names.
///
/// An exact match wins; otherwise the first sheet whose name matches after
/// lower-casing and collapsing whitespace is returned.
pub fn resolve_table_name<'a>(available: &'a [String], wanted: &str) -> Option<&'a str> {
    if let Some(exact) = available.iter().find(|name| *name == wanted) {
        return Some(exact.as_str());
    }
    let wanted = normalize_text(wanted);
    if wanted.is_empty() {
        return None;
    }
    available
        .iter()
        .find(|name| normalize_text(name) == wanted)
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        ["WTM Group", "shakti  team", "public", "Public"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_exact_match_wins() {
        let names = names();
        assert_eq!(resolve_table_name(&names, "Public"), Some("Public"));
        assert_eq!(resolve_table_name(&names, "public"), Some("public"));
    }

    #[test]
    fn test_normalized_match() {
        let names = names();
        assert_eq!(resolve_table_name(&names, "Shakti Team"), Some("shakti  team"));
        assert_eq!(resolve_table_name(&names, " wtm   GROUP "), Some("WTM Group"));
    }

    #[test]
    fn test_no_match() {
        let names = names();
        assert_eq!(resolve_table_name(&names, "Sakti Team"), None);
        assert_eq!(resolve_table_name(&names, "   "), None);
    }
}
