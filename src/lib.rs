//! # spamcheck
//!
//! Deterministic spam classification for short messages.
//!
//! ## Features
//!
//! - NLTK-compatible normalization (Treebank tokenization, English stop words, Porter stems)
//! - TF-IDF feature extraction from a pre-fit vocabulary artifact
//! - Interchangeable support-vector and naive Bayes classifiers
//! - Calibrated confidence with configurable confidence tiers
//! - Lock-free sharing of loaded artifacts across threads

pub mod analysis;
pub mod cli;
pub mod error;
pub mod ml;
pub mod pipeline;

pub mod prelude {
    pub use crate::analysis::analyzer::normalizer::{MessageNormalizer, NormalizedText};
    pub use crate::error::{ClassificationError, Result, SpamcheckError};
    pub use crate::ml::classifier::{Label, ModelSelector};
    pub use crate::pipeline::{ClassificationResult, ConfidenceTier, SpamPipeline};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
