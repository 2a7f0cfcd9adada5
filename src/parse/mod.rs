//! Transcript parsing
//!
//! Turns one finalized utterance ("spent $10.50 on coffee") into a
//! validated expense command, or a refusal the caller can surface as a
//! warning. Amount extraction runs first; the matched span is removed
//! from the text before the description is isolated.

pub mod amount;
pub mod description;

use crate::config::ParserConfig;
use crate::error::ParseError;
use amount::AmountExtractor;
use description::DescriptionExtractor;
use serde::Serialize;

/// A parsed expense command, ready for the record-add capability
///
/// `amount` is finite and strictly positive; `description` is non-empty
/// and trimmed. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedCommand {
    pub amount: f64,
    pub description: String,
}

/// Parses finalized utterances into expense commands
pub struct TranscriptParser {
    amount: AmountExtractor,
    description: DescriptionExtractor,
}

impl TranscriptParser {
    /// Create a parser from configuration
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            amount: AmountExtractor::new(),
            description: DescriptionExtractor::new(&config.extra_fillers),
        }
    }

    /// Parse one utterance
    ///
    /// Pure function: matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn parse(&self, utterance: &str) -> Result<ParsedCommand, ParseError> {
        let normalized = utterance.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ParseError::EmptyUtterance);
        }

        let matched = self
            .amount
            .extract(&normalized)
            .ok_or(ParseError::NoAmount)?;

        // Remove exactly the span the amount idiom consumed
        let residual = normalized.replacen(&matched.matched_span, "", 1);

        let description = self
            .description
            .extract(&residual)
            .ok_or(ParseError::NoDescription)?;

        Ok(ParsedCommand {
            amount: matched.value,
            description,
        })
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}
