//! Amount extraction
//!
//! Finds the first positive monetary amount in a normalized utterance by
//! trying an ordered list of numeric idioms, most specific first:
//!
//! 1. Currency-symbol-prefixed number ("$10.50", "€1,200")
//! 2. Number followed by a currency word ("5 dollars", "15 euro")
//! 3. Bare number anywhere in the text ("20")
//!
//! Thousands separators are stripped; "." is the only decimal separator.
//! Locale-aware parsing is out of scope.

use regex::Regex;

/// A successfully extracted amount
///
/// `matched_span` is the literal substring consumed (symbol and currency
/// word included) so the description extractor can remove it unambiguously.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountMatch {
    pub value: f64,
    pub matched_span: String,
}

/// One recognized numeric idiom; the list order is the priority order
struct AmountPattern {
    regex: Regex,
    idiom: &'static str,
}

/// Extracts amounts from normalized (lower-cased) text
pub struct AmountExtractor {
    patterns: Vec<AmountPattern>,
}

// A plain or comma-grouped integer, with an optional fraction
const NUMBER: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)";

impl AmountExtractor {
    pub fn new() -> Self {
        let patterns = vec![
            // "$10.50", "£3", "€1,200.99" - fraction limited to cents
            AmountPattern {
                regex: Regex::new(&format!(r"[$£€](?P<num>{NUMBER}(?:\.\d{{1,2}})?)"))
                    .expect("symbol pattern is valid"),
                idiom: "symbol-prefixed",
            },
            // "5 dollars", "15 euro", "2.50 quid" - word boundary required
            AmountPattern {
                regex: Regex::new(&format!(
                    r"\b(?P<num>{NUMBER}(?:\.\d+)?)\s*(?:dollars?|pounds?|euros?|bucks?|quid|usd|gbp|eur)\b"
                ))
                .expect("currency word pattern is valid"),
                idiom: "word-suffixed",
            },
            // Bare number fallback
            AmountPattern {
                regex: Regex::new(&format!(r"\b(?P<num>{NUMBER}(?:\.\d+)?)"))
                    .expect("bare number pattern is valid"),
                idiom: "bare",
            },
        ];

        Self { patterns }
    }

    /// Return the first positive, finite amount found, or None
    ///
    /// A candidate whose parsed value is non-finite or not strictly
    /// positive falls through to the next idiom in the list.
    pub fn extract(&self, text: &str) -> Option<AmountMatch> {
        for pattern in &self.patterns {
            let Some(caps) = pattern.regex.captures(text) else {
                continue;
            };

            let digits = caps
                .name("num")
                .expect("every amount pattern captures 'num'")
                .as_str()
                .replace(',', "");

            match digits.parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => {
                    let span = caps.get(0).expect("capture 0 always exists");
                    tracing::trace!(idiom = pattern.idiom, value, "amount matched");
                    return Some(AmountMatch {
                        value,
                        matched_span: span.as_str().to_string(),
                    });
                }
                _ => {
                    tracing::trace!(idiom = pattern.idiom, "candidate rejected, trying next idiom");
                }
            }
        }

        None
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<AmountMatch> {
        AmountExtractor::new().extract(text)
    }

    #[test]
    fn test_symbol_prefixed() {
        let m = extract("spent $10.50 on coffee").unwrap();
        assert_eq!(m.value, 10.50);
        assert_eq!(m.matched_span, "$10.50");

        let m = extract("paid £3 for tea").unwrap();
        assert_eq!(m.value, 3.0);
        assert_eq!(m.matched_span, "£3");

        let m = extract("€42 parking").unwrap();
        assert_eq!(m.value, 42.0);
    }

    #[test]
    fn test_word_suffixed() {
        let m = extract("add expense 5 dollars for lunch").unwrap();
        assert_eq!(m.value, 5.0);
        assert_eq!(m.matched_span, "5 dollars");

        let m = extract("log 15 euro taxi").unwrap();
        assert_eq!(m.value, 15.0);
        assert_eq!(m.matched_span, "15 euro");

        let m = extract("that was 2.50 quid").unwrap();
        assert_eq!(m.value, 2.50);
    }

    #[test]
    fn test_bare_number_fallback() {
        let m = extract("lunch 12 with tip").unwrap();
        assert_eq!(m.value, 12.0);
        assert_eq!(m.matched_span, "12");
    }

    #[test]
    fn test_symbol_wins_over_bare() {
        // "2" appears first, but the symbol idiom has priority
        let m = extract("table for 2 cost $30").unwrap();
        assert_eq!(m.value, 30.0);
        assert_eq!(m.matched_span, "$30");
    }

    #[test]
    fn test_currency_word_wins_over_bare() {
        let m = extract("2 people, 40 dollars dinner").unwrap();
        assert_eq!(m.value, 40.0);
        assert_eq!(m.matched_span, "40 dollars");
    }

    #[test]
    fn test_thousands_separators_stripped() {
        let m = extract("$1,200.50 rent").unwrap();
        assert_eq!(m.value, 1200.50);
        assert_eq!(m.matched_span, "$1,200.50");
    }

    #[test]
    fn test_zero_is_rejected() {
        // each idiom only offers its first candidate, and both offer 0 here
        assert!(extract("$0 freebie").is_none());
    }

    #[test]
    fn test_zero_falls_through_to_next_idiom() {
        // the symbol idiom offers $0 and is rejected; the currency-word
        // idiom still yields the real amount
        let m = extract("$0 promo but lunch was 12 dollars").unwrap();
        assert_eq!(m.value, 12.0);
        assert_eq!(m.matched_span, "12 dollars");
    }

    #[test]
    fn test_no_number_at_all() {
        assert!(extract("hello there").is_none());
        assert!(extract("").is_none());
        assert!(extract("zero dollars spent today, honest").is_none());
    }

    #[test]
    fn test_word_requires_boundary() {
        // "5k" is not "5 kilo-dollars"; the bare idiom still picks up 5
        let m = extract("ran 5k this morning").unwrap();
        assert_eq!(m.matched_span, "5");
    }
}
