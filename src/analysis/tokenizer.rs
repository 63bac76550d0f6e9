//! Tokenizer implementations for text analysis.
//!
//! Tokenizers split the (already lowercased) message into word tokens.
//!
//! # Available Tokenizers
//!
//! - [`treebank::TreebankWordTokenizer`] - Penn Treebank word tokenization with
//!   sentence splitting, compatible with NLTK's `word_tokenize`
//! - [`sentence::SentenceSplitter`] - The sentence boundary detector it runs first
//!
//! # Examples
//!
//! ```
//! use spamcheck::analysis::tokenizer::Tokenizer;
//! use spamcheck::analysis::tokenizer::treebank::TreebankWordTokenizer;
//!
//! let tokenizer = TreebankWordTokenizer::new().unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("don't stop.").unwrap().map(|t| t.text).collect();
//! assert_eq!(tokens, vec!["do", "n't", "stop", "."]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so a tokenizer can be shared by
/// concurrent classification requests.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod sentence;
pub mod treebank;

pub use sentence::SentenceSplitter;
pub use treebank::TreebankWordTokenizer;
