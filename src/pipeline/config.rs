//! Pipeline configuration.
//!
//! ```json
//! {
//!   "artifacts": {
//!     "vectorizer": "best_models/tfidf.json",
//!     "primary_model": "best_models/svc_best.json",
//!     "secondary_model": "best_models/nb_model.json"
//!   },
//!   "pipeline": {
//!     "min_message_length": 5,
//!     "thresholds": { "high": 90.0, "medium": 70.0 },
//!     "diagnostic_max_chars": 50
//!   }
//! }
//! ```
//!
//! Every field is optional; missing fields take the defaults shown.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamcheckError};

/// Confidence percentages that separate the HIGH, MEDIUM and LOW tiers.
///
/// A confidence strictly above `high` is HIGH; strictly above `medium` is
/// MEDIUM; anything else is LOW.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        ConfidenceThresholds {
            high: 90.0,
            medium: 70.0,
        }
    }
}

impl ConfidenceThresholds {
    /// Requires `0 <= medium <= high <= 100`.
    pub fn validate(&self) -> Result<()> {
        let ordered = 0.0 <= self.medium && self.medium <= self.high && self.high <= 100.0;
        if !ordered {
            return Err(SpamcheckError::config(format!(
                "Confidence thresholds must satisfy 0 <= medium <= high <= 100, got medium={} high={}",
                self.medium, self.high
            )));
        }
        Ok(())
    }
}

/// Request handling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum trimmed message length in characters.
    pub min_message_length: usize,
    pub thresholds: ConfidenceThresholds,
    /// Characters of a fault description kept in a failure diagnostic.
    pub diagnostic_max_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            min_message_length: 5,
            thresholds: ConfidenceThresholds::default(),
            diagnostic_max_chars: 50,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_message_length == 0 {
            return Err(SpamcheckError::config(
                "min_message_length must be at least 1",
            ));
        }
        self.thresholds.validate()
    }
}

/// Locations of the three artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub primary_model: PathBuf,
    pub secondary_model: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        ArtifactPaths {
            vectorizer: PathBuf::from("best_models/tfidf.json"),
            primary_model: PathBuf::from("best_models/svc_best.json"),
            secondary_model: PathBuf::from("best_models/nb_model.json"),
        }
    }
}

impl ArtifactPaths {
    /// The three default file names inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        ArtifactPaths {
            vectorizer: dir.join("tfidf.json"),
            primary_model: dir.join("svc_best.json"),
            secondary_model: dir.join("nb_model.json"),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamcheckConfig {
    pub artifacts: ArtifactPaths,
    pub pipeline: PipelineConfig,
}

impl SpamcheckConfig {
    /// Read and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SpamcheckConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()
    }
}
