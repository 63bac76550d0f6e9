//! Token filter implementations for token transformation.
//!
//! Filters run after the tokenizer, in the order the analyzer lists them.
//! The message normalizer uses three of them:
//!
//! 1. [`AlphanumericFilter`] drops tokens that contain punctuation
//! 2. [`StopFilter`] drops English stopwords and lone punctuation marks
//! 3. [`StemFilter`] reduces the survivors to their Porter stems

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod alphanumeric;
pub mod stem;
pub mod stop;

pub use alphanumeric::AlphanumericFilter;
pub use stem::{PorterStemmer, StemFilter, Stemmer};
pub use stop::StopFilter;
