//! Region name normalization

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized region identifier.
///
/// Holds lower-case ASCII letters only. Two spellings of the same region
/// collapse to one key, but unrelated names may collide as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionKey(String);

impl RegionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RegionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a free-text region name into a [`RegionKey`].
///
/// Lower-cases, turns hyphen and dash variants into spaces, drops
/// apostrophes and parentheses, strips a trailing `region` word and finally
/// removes everything that is not an ASCII letter. "Bono East Region",
/// "bono-east" and "BONO  EAST" all become `bonoeast`.
pub fn normalize(name: &str) -> RegionKey {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}' | '(' | ')'))
        .map(|c| match c {
            '-' | '\u{2013}' | '\u{2014}' => ' ',
            other => other,
        })
        .collect();

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let words = match words.split_last() {
        // A lone "region" is kept: it is the whole name, not a suffix
        Some((last, rest)) if *last == "region" && !rest.is_empty() => rest,
        _ => &words[..],
    };

    RegionKey(
        words
            .iter()
            .flat_map(|word| word.chars())
            .filter(|c| c.is_ascii_lowercase())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(normalize("Greater Accra").as_str(), "greateraccra");
        assert_eq!(normalize("Techiman Municipal").as_str(), "techimanmunicipal");
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(normalize("Greater Accra"), normalize("greater   accra"));
        assert_eq!(normalize("  UPPER\tEAST "), normalize("upper east"));
    }

    #[test]
    fn test_region_suffix_stripped() {
        assert_eq!(normalize("Bono East Region").as_str(), "bonoeast");
        assert_eq!(normalize("Volta region").as_str(), "volta");
        assert_eq!(normalize("Region").as_str(), "region");
    }

    #[test]
    fn test_punctuation_and_dashes() {
        assert_eq!(normalize("Ga-East (Municipality)").as_str(), "gaeastmunicipality");
        assert_eq!(normalize("Bono\u{2014}East").as_str(), "bonoeast");
        assert_eq!(normalize("Ledzokuku\u{2019}Krowor").as_str(), "ledzokukukrowor");
        assert_eq!(normalize("Bono-Region").as_str(), "bono");
    }

    #[test]
    fn test_digits_and_non_ascii_removed() {
        assert_eq!(normalize("Region 5 North").as_str(), "regionnorth");
        assert_eq!(normalize("Séfwi").as_str(), "sfwi");
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("   ").is_empty());
        assert!(normalize("123 - ()").is_empty());
    }

    #[test]
    fn test_idempotent() {
        for name in [
            "Greater Accra",
            "Bono East Region",
            "Northern Region Region",
            "Upper-West (Wa)",
            "region",
            "",
        ] {
            let once = normalize(name);
            assert_eq!(normalize(once.as_str()), once, "not idempotent for {name:?}");
        }
    }
}
