//! Analyzers combine a tokenizer with char filters and token filters.
//!
//! ```text
//! Raw Text → Char Filters → Tokenizer → Filter 1 → ... → Filter N → Tokens
//! ```
//!
//! - [`PipelineAnalyzer`] - Custom tokenizer + filter chains
//! - [`MessageNormalizer`] - The fixed chain that turns a message into its
//!   canonical stem sequence

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that turn raw text into a token stream.
///
/// # Examples
///
/// ```
/// use spamcheck::analysis::analyzer::Analyzer;
/// use spamcheck::analysis::token::TokenStream;
/// use spamcheck::error::Result;
///
/// struct NothingAnalyzer;
///
/// impl Analyzer for NothingAnalyzer {
///     fn analyze(&self, _text: &str) -> Result<TokenStream> {
///         Ok(Box::new(std::iter::empty()))
///     }
///
///     fn name(&self) -> &'static str {
///         "nothing"
///     }
/// }
///
/// assert_eq!(NothingAnalyzer.analyze("anything").unwrap().count(), 0);
/// ```
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod normalizer;
pub mod pipeline;

pub use normalizer::{MessageNormalizer, NormalizedText};
pub use pipeline::PipelineAnalyzer;
