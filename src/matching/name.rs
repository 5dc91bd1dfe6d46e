// src/matching/name.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of characters that are neither alphanumeric nor whitespace. `\w`
/// admits underscore, so it is listed explicitly.
pub(crate) static NON_WORD_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[^\s\w]|_)+").expect("static pattern compiles"));

/// Lowercases, turns punctuation runs into single spaces and collapses whitespace.
pub(crate) fn strip_punctuation(value: &str) -> String {
    let lower = value.to_lowercase();
    NON_WORD_RUN.replace_all(&lower, " ").into_owned()
}

/// Cleans a site name into a lowercase phrase of single-space separated words.
pub fn normalize_site_name(name: &str) -> String {
    strip_punctuation(name)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a normalized phrase into its ordered words.
pub fn tokenize(normalized: &str) -> Vec<String> {
    normalized.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_name_normalization() {
        assert_eq!(normalize_site_name("The  Corner-Store!!"), "the corner store");
        assert_eq!(normalize_site_name("  Joe's   Diner "), "joe s diner");
        assert_eq!(normalize_site_name("snake_case__name"), "snake case name");
        assert_eq!(normalize_site_name("Tab\tand\nnewline"), "tab and newline");
        assert_eq!(normalize_site_name("!!!"), "");
    }

    #[test]
    fn test_site_name_keeps_unicode_letters() {
        assert_eq!(normalize_site_name("Café Ñandú #2"), "café ñandú 2");
    }

    #[test]
    fn test_site_name_idempotent() {
        for raw in ["The  Corner-Store!!", "A&B  Co.", "  ", "St. Mary's (Annex)"] {
            let once = normalize_site_name(raw);
            assert_eq!(normalize_site_name(&once), once);
        }
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("the corner store"), vec!["the", "corner", "store"]);
        assert!(tokenize("").is_empty());
    }
}
