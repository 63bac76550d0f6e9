//! Classification results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::NormalizedText;
use crate::ml::classifier::{ClassProbabilities, Label, ModelSelector};
use crate::pipeline::config::ConfidenceThresholds;

/// Coarse bucket of the confidence percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// Bucket a confidence percentage. Boundaries are exclusive: exactly
    /// `high` is MEDIUM.
    pub fn from_confidence(confidence: f64, thresholds: &ConfidenceThresholds) -> Self {
        if confidence > thresholds.high {
            ConfidenceTier::High
        } else if confidence > thresholds.medium {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceTier::High => "HIGH",
            ConfidenceTier::Medium => "MEDIUM",
            ConfidenceTier::Low => "LOW",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// Probability of `label`, as a percentage in `[0, 100]`.
    pub confidence: f64,
    pub confidence_tier: ConfidenceTier,
    pub model_used: ModelSelector,
    /// Number of terms in `normalized_text`.
    pub token_count: usize,
    pub probabilities: ClassProbabilities,
    pub normalized_text: NormalizedText,
}

impl ClassificationResult {
    pub fn is_spam(&self) -> bool {
        self.label.is_spam()
    }
}
