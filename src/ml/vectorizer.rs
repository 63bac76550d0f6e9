//! Vectorizers turn normalized text into feature vectors.

use crate::analysis::analyzer::NormalizedText;
use crate::error::Result;
use crate::ml::features::FeatureVector;

/// Trait for vectorizers backed by a pre-fit vocabulary.
///
/// Implementations are read-only after construction and shared across
/// threads.
pub trait Vectorizer: Send + Sync + std::fmt::Debug {
    /// Map normalized text to a vector of [`dimension`](Vectorizer::dimension)
    /// features. Unknown terms contribute nothing.
    fn transform(&self, text: &NormalizedText) -> Result<FeatureVector>;

    /// The fixed output dimension.
    fn dimension(&self) -> usize;

    /// Get the name of this vectorizer (for debugging and logging).
    fn name(&self) -> &'static str;
}

pub mod tfidf;

pub use tfidf::{Norm, TfIdfVectorizer};
