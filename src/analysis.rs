//! Text analysis for spamcheck.
//!
//! This module turns raw messages into the canonical token stream the
//! vocabulary was fitted on. The pipeline is the classic
//! char filter → tokenizer → token filters chain:
//!
//! ```text
//! Raw Text → Lowercase → Treebank Tokenizer → Alphanumeric → Stop Words → Porter Stemmer
//! ```

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
