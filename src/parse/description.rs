//! Description extraction
//!
//! Works on the residual text left after the amount span has been
//! removed. A delimiter keyword ("on", "for") marks where the
//! description starts; without one the whole residual is the candidate.
//! Filler words and punctuation are trimmed from both ends.

use regex::Regex;
use std::collections::HashSet;

// Command verbs and glue words that carry no expense meaning
const FILLER_WORDS: &[&str] = &[
    "spent", "add", "log", "cost", "expense", "was", "is", "buy", "get", "paid", "i", "a", "an",
    "the",
];

/// Extracts the expense description from post-amount residual text
pub struct DescriptionExtractor {
    delimiter: Regex,
    fillers: HashSet<String>,
}

impl DescriptionExtractor {
    /// Create an extractor; `extra_fillers` extends the built-in filler
    /// word set (it never replaces it)
    pub fn new(extra_fillers: &[String]) -> Self {
        let mut fillers: HashSet<String> =
            FILLER_WORDS.iter().map(|w| w.to_string()).collect();
        fillers.extend(extra_fillers.iter().map(|w| w.to_lowercase()));

        Self {
            delimiter: Regex::new(r"\b(?:on|for)\b").expect("delimiter pattern is valid"),
            fillers,
        }
    }

    /// Return the cleaned description, or None if nothing is left
    pub fn extract(&self, residual: &str) -> Option<String> {
        let candidate = match self.delimiter.find(residual) {
            // Text strictly after the first delimiter keyword
            Some(m) => &residual[m.end()..],
            None => residual,
        };

        let cleaned = self.trim_candidate(candidate);
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }

    /// Strip punctuation from word edges and filler words from both ends
    fn trim_candidate(&self, text: &str) -> String {
        let mut words: Vec<&str> = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
            .filter(|w| !w.is_empty())
            .collect();

        while words.first().is_some_and(|w| self.fillers.contains(*w)) {
            words.remove(0);
        }
        while words.last().is_some_and(|w| self.fillers.contains(*w)) {
            words.pop();
        }

        words.join(" ")
    }
}

impl Default for DescriptionExtractor {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(residual: &str) -> Option<String> {
        DescriptionExtractor::default().extract(residual)
    }

    #[test]
    fn test_delimiter_on() {
        assert_eq!(extract("spent  on coffee").as_deref(), Some("coffee"));
    }

    #[test]
    fn test_delimiter_for() {
        assert_eq!(extract("add expense  for lunch").as_deref(), Some("lunch"));
    }

    #[test]
    fn test_no_delimiter_uses_residual() {
        assert_eq!(extract(" groceries").as_deref(), Some("groceries"));
    }

    #[test]
    fn test_filler_words_trimmed() {
        assert_eq!(extract("log  taxi").as_deref(), Some("taxi"));
        assert_eq!(extract("paid  the plumber").as_deref(), Some("plumber"));
        assert_eq!(extract("buy groceries was").as_deref(), Some("groceries"));
    }

    #[test]
    fn test_interior_fillers_survive() {
        // only the ends are trimmed; the interior "the" stays
        assert_eq!(
            extract("on coffee with the milk").as_deref(),
            Some("coffee with the milk")
        );
    }

    #[test]
    fn test_punctuation_trimmed() {
        assert_eq!(extract("on coffee.").as_deref(), Some("coffee"));
        assert_eq!(extract("on \"team lunch,\"").as_deref(), Some("team lunch"));
    }

    #[test]
    fn test_multiword_description() {
        assert_eq!(
            extract("on coffee with sarah").as_deref(),
            Some("coffee with sarah")
        );
    }

    #[test]
    fn test_empty_residual_fails() {
        assert_eq!(extract(""), None);
        assert_eq!(extract("   "), None);
        assert_eq!(extract("spent on"), None);
        assert_eq!(extract("the a an"), None);
    }

    #[test]
    fn test_delimiter_inside_word_is_not_split() {
        // "on" inside "monday" is not a delimiter
        assert_eq!(extract("monday groceries").as_deref(), Some("monday groceries"));
    }

    #[test]
    fn test_extra_fillers_extend_the_set() {
        let extractor = DescriptionExtractor::new(&["um".to_string(), "Uh".to_string()]);
        assert_eq!(extractor.extract("um  taxi uh").as_deref(), Some("taxi"));
        // built-ins still apply
        assert_eq!(extractor.extract("spent  on coffee").as_deref(), Some("coffee"));
    }
}
