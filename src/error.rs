//! Error types for spamcheck.
//!
//! Two error families live here:
//!
//! - [`SpamcheckError`] covers everything that can go wrong inside the crate:
//!   artifact loading, analysis, vectorization and model evaluation. Errors
//!   raised while loading artifacts are fatal: a pipeline is never built from
//!   a broken artifact.
//! - [`ClassificationError`] is the per-request taxonomy handed back to the
//!   caller of [`SpamPipeline::classify_message`](crate::pipeline::SpamPipeline::classify_message).
//!
//! # Examples
//!
//! ```
//! use spamcheck::error::{Result, SpamcheckError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SpamcheckError::model("probability estimate is NaN"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for spamcheck operations.
#[derive(Error, Debug)]
pub enum SpamcheckError {
    /// I/O errors (reading artifacts, config files, batch input)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An artifact could not be loaded or failed validation. Startup only.
    #[error("Failed to load {artifact} artifact from {}: {reason}", path.display())]
    ArtifactLoad {
        artifact: String,
        path: PathBuf,
        reason: String,
    },

    /// Artifact content is internally inconsistent
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Feature dimensionality disagreement between two components
    #[error("Dimension mismatch: {context} expects {expected} features, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Vectorization errors
    #[error("Vectorization error: {0}")]
    Vectorization(String),

    /// Model evaluation errors
    #[error("Model error: {0}")]
    Model(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SpamcheckError.
pub type Result<T> = std::result::Result<T, SpamcheckError>;

impl SpamcheckError {
    /// Create a new artifact load error.
    pub fn artifact_load<A, P, R>(artifact: A, path: P, reason: R) -> Self
    where
        A: Into<String>,
        P: Into<PathBuf>,
        R: ToString,
    {
        SpamcheckError::ArtifactLoad {
            artifact: artifact.into(),
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new artifact consistency error.
    pub fn artifact<S: Into<String>>(msg: S) -> Self {
        SpamcheckError::Artifact(msg.into())
    }

    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch<S: Into<String>>(context: S, expected: usize, actual: usize) -> Self {
        SpamcheckError::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SpamcheckError::Analysis(msg.into())
    }

    /// Create a new vectorization error.
    pub fn vectorization<S: Into<String>>(msg: S) -> Self {
        SpamcheckError::Vectorization(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        SpamcheckError::Model(msg.into())
    }

    /// Create a new invalid config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SpamcheckError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SpamcheckError::Other(msg.into())
    }
}

/// Why a single classification request produced no result.
///
/// `EmptyInput` and `TooShort` are caller mistakes and are detected before
/// any model runs. The two failure variants indicate a broken artifact and
/// carry a truncated diagnostic; retrying the same input will not help.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationError {
    #[error("Please enter a message to classify")]
    EmptyInput,

    #[error("Message is too short (minimum {min_length} characters)")]
    TooShort { length: usize, min_length: usize },

    #[error("Vectorization failed: {diagnostic}")]
    VectorizationFailure { diagnostic: String },

    #[error("Classification failed: {diagnostic}")]
    ClassificationFailure { diagnostic: String },
}

impl ClassificationError {
    /// Whether the caller can recover by supplying different input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ClassificationError::EmptyInput | ClassificationError::TooShort { .. }
        )
    }

    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassificationError::EmptyInput => "empty_input",
            ClassificationError::TooShort { .. } => "too_short",
            ClassificationError::VectorizationFailure { .. } => "vectorization_failure",
            ClassificationError::ClassificationFailure { .. } => "classification_failure",
        }
    }
}

/// Keep the first `max_chars` characters of a fault description.
pub fn truncate_diagnostic(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SpamcheckError::analysis("Test analysis error");
        assert_eq!(error.to_string(), "Analysis error: Test analysis error");

        let error = SpamcheckError::dimension_mismatch("svc", 3000, 12);
        assert_eq!(
            error.to_string(),
            "Dimension mismatch: svc expects 3000 features, got 12"
        );

        let error = SpamcheckError::artifact_load("vectorizer", "models/tfidf.json", "missing");
        assert_eq!(
            error.to_string(),
            "Failed to load vectorizer artifact from models/tfidf.json: missing"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = SpamcheckError::from(io_error);

        match error {
            SpamcheckError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_classification_error_messages() {
        assert_eq!(
            ClassificationError::EmptyInput.to_string(),
            "Please enter a message to classify"
        );
        let too_short = ClassificationError::TooShort {
            length: 2,
            min_length: 5,
        };
        assert_eq!(
            too_short.to_string(),
            "Message is too short (minimum 5 characters)"
        );
        assert!(too_short.is_input_error());
        assert_eq!(too_short.kind(), "too_short");

        let failure = ClassificationError::ClassificationFailure {
            diagnostic: "boom".to_string(),
        };
        assert!(!failure.is_input_error());
    }

    #[test]
    fn test_truncate_diagnostic() {
        let long = "x".repeat(120);
        assert_eq!(truncate_diagnostic(&long, 50).chars().count(), 50);
        assert_eq!(truncate_diagnostic("short", 50), "short");
        // Truncation counts characters, not bytes
        assert_eq!(truncate_diagnostic("ééééé", 3), "ééé");
    }
}
