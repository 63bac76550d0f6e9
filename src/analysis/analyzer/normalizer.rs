//! Message normalization.
//!
//! [`MessageNormalizer`] is the fixed analysis chain applied to every message
//! before vectorization:
//!
//! 1. lowercase the whole message
//! 2. split into sentences, then into Treebank word tokens
//! 3. keep only purely alphanumeric tokens
//! 4. drop English stopwords and punctuation
//! 5. reduce each token to its Porter stem
//! 6. join the stems with single spaces
//!
//! Normalization is total: every input, including the empty string, yields a
//! (possibly empty) [`NormalizedText`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::char_filter::LowercaseCharFilter;
use crate::analysis::token_filter::{AlphanumericFilter, StemFilter, StopFilter};
use crate::analysis::tokenizer::TreebankWordTokenizer;
use crate::error::Result;

/// The canonical form of a message: lowercase stems separated by single spaces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Build a normalized text from already normalized terms.
    pub(crate) fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for term in terms {
            let term = term.as_ref();
            if term.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(term);
        }
        NormalizedText(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the terms in order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    /// Number of terms; zero for an empty text.
    pub fn token_count(&self) -> usize {
        self.terms().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turns raw messages into [`NormalizedText`].
///
/// # Examples
///
/// ```
/// use spamcheck::analysis::analyzer::MessageNormalizer;
///
/// let normalizer = MessageNormalizer::new().unwrap();
/// let normalized = normalizer.normalize("Congratulations! You've won $1,000,000!");
///
/// assert_eq!(normalized.as_str(), "congratul");
/// assert_eq!(normalized.token_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct MessageNormalizer {
    analyzer: PipelineAnalyzer,
}

impl MessageNormalizer {
    /// Create the normalizer. Fails only if a tokenizer or filter pattern does not compile.
    pub fn new() -> Result<Self> {
        let tokenizer = Arc::new(TreebankWordTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_char_filter(Arc::new(LowercaseCharFilter::new()))
            .add_filter(Arc::new(AlphanumericFilter::new()?))
            .add_filter(Arc::new(StopFilter::english()))
            .add_filter(Arc::new(StemFilter::new()))
            .with_name("message_normalizer");

        Ok(MessageNormalizer { analyzer })
    }

    /// Normalize `text`. Never fails.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        match self.analyzer.analyze(text) {
            Ok(tokens) => NormalizedText::from_terms(tokens.map(|token| token.text)),
            Err(e) => {
                tracing::warn!(error = %e, "analysis failed, treating message as empty");
                NormalizedText::default()
            }
        }
    }

    /// The underlying analyzer.
    pub fn analyzer(&self) -> &PipelineAnalyzer {
        &self.analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        MessageNormalizer::new().unwrap().normalize(text).into_string()
    }

    #[test]
    fn test_prize_message() {
        assert_eq!(
            normalize(
                "Congratulations! You've won $1,000,000! Click here to claim your prize: bit.ly/winprize123\nLimited time offer!"
            ),
            "congratul click claim prize limit time offer"
        );
    }

    #[test]
    fn test_ham_message() {
        assert_eq!(
            normalize("Sorry, I'll call you later. Are we meeting for lunch tomorrow?"),
            "sorri call later meet lunch tomorrow"
        );
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("!!! ... ???"), "");
        assert_eq!(normalize("the and of"), "");
    }

    #[test]
    fn test_idempotent_on_normalized_text() {
        let normalizer = MessageNormalizer::new().unwrap();
        let once = normalizer.normalize("FREE entry to WIN cash prizes, txt now");
        let twice = normalizer.normalize(once.as_str());

        assert_eq!(once.as_str(), "free entri win cash prize txt");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_token_count() {
        let normalizer = MessageNormalizer::new().unwrap();
        assert_eq!(normalizer.normalize("claim your prize").token_count(), 2);
        assert_eq!(normalizer.normalize("").token_count(), 0);
    }

    #[test]
    fn test_from_terms_skips_empty_terms() {
        let text = NormalizedText::from_terms(["win", "", "cash"]);
        assert_eq!(text.as_str(), "win cash");
        assert_eq!(text.terms().collect::<Vec<_>>(), vec!["win", "cash"]);
        assert_eq!(text.to_string(), "win cash");
    }
}
