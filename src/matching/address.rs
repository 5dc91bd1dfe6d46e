// src/matching/address.rs
use serde::{Deserialize, Serialize};

use crate::matching::name::strip_punctuation;

const DEFAULT_STREET_TYPES: [&str; 15] = [
    "st", "rd", "ave", "ct", "dr", "pl", "blvd", "street", "road", "avenue", "court", "drive",
    "place", "terrace", "boulevard",
];

const DEFAULT_DIRECTIONALS: [(&str, &str); 4] =
    [("north", "n"), ("south", "s"), ("east", "e"), ("west", "w")];

/// Whole-word rewrites applied to cleaned addresses.
///
/// Street types are removed, directionals are abbreviated. Replacements are
/// looked up per word, so an inserted abbreviation is never rewritten again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressDictionary {
    pub street_types: Vec<String>,
    pub directionals: Vec<(String, String)>,
}

impl Default for AddressDictionary {
    fn default() -> Self {
        Self {
            street_types: DEFAULT_STREET_TYPES.iter().map(|s| s.to_string()).collect(),
            directionals: DEFAULT_DIRECTIONALS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl AddressDictionary {
    /// Replacement for one word, `None` when the word is kept as is.
    /// Street types are consulted before directionals.
    fn rewrite<'a>(&'a self, word: &str) -> Option<&'a str> {
        if self.street_types.iter().any(|t| t == word) {
            return Some("");
        }
        self.directionals
            .iter()
            .find(|(from, _)| from == word)
            .map(|(_, to)| to.as_str())
    }
}

/// Cleans an address, drops street type words and abbreviates compass directions.
pub fn normalize_address(address: &str, dictionary: &AddressDictionary) -> String {
    // Rewriting word by word matches at the string edges as well as inside.
    strip_punctuation(address)
        .split_whitespace()
        .filter_map(|word| match dictionary.rewrite(word) {
            Some("") => None,
            Some(replacement) => Some(replacement),
            None => Some(word),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(address: &str) -> String {
        normalize_address(address, &AddressDictionary::default())
    }

    #[test]
    fn test_address_normalization() {
        assert_eq!(normalize("123 North Main St."), "123 n main");
        assert_eq!(normalize("45 West Elm Avenue"), "45 w elm");
        assert_eq!(normalize("9 Sunset Blvd, Apt #4"), "9 sunset apt 4");
        assert_eq!(normalize("1 Terrace Rd"), "1");
    }

    #[test]
    fn test_street_words_inside_other_words_survive() {
        assert_eq!(normalize("77 Stanford Drive"), "77 stanford");
        assert_eq!(normalize("12 Northern Ave"), "12 northern");
    }

    #[test]
    fn test_custom_dictionary() {
        let dictionary = AddressDictionary {
            street_types: vec!["ln".to_string()],
            directionals: vec![("ne".to_string(), "northeast".to_string())],
        };
        assert_eq!(
            normalize_address("5 NE Maple Ln St", &dictionary),
            "5 northeast maple st"
        );
    }

    #[test]
    fn test_address_idempotent() {
        for raw in ["123 North Main St.", "PO Box 12", "", "East  West Court"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }
}
