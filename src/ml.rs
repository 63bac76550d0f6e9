//! Feature extraction and classification models.
//!
//! Everything here is loaded from pre-fit artifacts and is read-only
//! afterwards:
//!
//! - [`vectorizer`] - TF-IDF features from normalized text
//! - [`classifier`] - the support-vector and naive Bayes models
//! - [`artifact`] - the JSON export format of both

pub mod artifact;
pub mod classifier;
pub mod features;
pub mod vectorizer;

pub use classifier::{BinaryClassifier, ClassifierAdapter, Label, ModelSelector, Prediction};
pub use features::FeatureVector;
pub use vectorizer::{TfIdfVectorizer, Vectorizer};
