//! End-to-end message classification.
//!
//! A raw message is trimmed and validated, normalized into stemmed terms,
//! weighted by the TF-IDF vectorizer and handed to the selected model. The
//! [`SpamPipeline`] owns every stage; [`SpamcheckConfig`] says where the
//! fitted artifacts live and how requests are judged.

pub mod config;
pub mod orchestrator;
pub mod result;

pub use config::{ArtifactPaths, ConfidenceThresholds, PipelineConfig, SpamcheckConfig};
pub use orchestrator::{ClassificationOutcome, SpamPipeline};
pub use result::{ClassificationResult, ConfidenceTier};
