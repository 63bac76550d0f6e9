//! Binary spam classifiers.
//!
//! Two pre-fit models sit behind the [`BinaryClassifier`] trait:
//!
//! - [`SupportVectorClassifier`] - the PRIMARY model
//! - [`NaiveBayesClassifier`] - the SECONDARY model
//!
//! [`ClassifierAdapter`] holds both and dispatches on a [`ModelSelector`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamcheckError};
use crate::ml::features::FeatureVector;

pub mod adapter;
pub mod naive_bayes;
pub mod svc;

pub use adapter::ClassifierAdapter;
pub use naive_bayes::{NaiveBayesClassifier, NaiveBayesVariant};
pub use svc::{Kernel, SparseVector, SupportVectorClassifier};

/// Tolerance on `p(not spam) + p(spam) = 1`.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// The two classes. Index 0 is "not spam", index 1 is "spam".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    NotSpam,
    Spam,
}

impl Label {
    /// Class index as used by the fitted models.
    pub fn index(self) -> usize {
        match self {
            Label::NotSpam => 0,
            Label::Spam => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Label::NotSpam),
            1 => Some(Label::Spam),
            _ => None,
        }
    }

    pub fn is_spam(self) -> bool {
        self == Label::Spam
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::NotSpam => "NOT_SPAM",
            Label::Spam => "SPAM",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated `[p(not spam), p(spam)]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    not_spam: f64,
    spam: f64,
}

impl ClassProbabilities {
    /// Both values must lie in `[0, 1]` and sum to one within
    /// [`PROBABILITY_TOLERANCE`].
    pub fn new(not_spam: f64, spam: f64) -> Result<Self> {
        let in_range = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
        if !in_range(not_spam) || !in_range(spam) {
            return Err(SpamcheckError::model(format!(
                "Probabilities out of range: [{not_spam}, {spam}]"
            )));
        }
        if ((not_spam + spam) - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(SpamcheckError::model(format!(
                "Probabilities do not sum to one: [{not_spam}, {spam}]"
            )));
        }
        Ok(ClassProbabilities { not_spam, spam })
    }

    pub fn not_spam(&self) -> f64 {
        self.not_spam
    }

    pub fn spam(&self) -> f64 {
        self.spam
    }

    pub fn get(&self, label: Label) -> f64 {
        match label {
            Label::NotSpam => self.not_spam,
            Label::Spam => self.spam,
        }
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.not_spam, self.spam]
    }
}

/// Label and probabilities from one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    pub probabilities: ClassProbabilities,
}

impl Prediction {
    /// Probability mass of the predicted class, in `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        self.probabilities.get(self.label)
    }
}

/// A pre-fit binary classifier.
pub trait BinaryClassifier: Send + Sync + fmt::Debug {
    /// Predict the class of `features`.
    fn predict(&self, features: &FeatureVector) -> Result<Label>;

    /// Class probabilities `[p(not spam), p(spam)]`.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]>;

    /// Dimension the model was fitted on.
    fn n_features(&self) -> usize;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &'static str;

    /// One-line description of the fitted model.
    fn describe(&self) -> String {
        format!("{} ({} features)", self.name(), self.n_features())
    }
}

/// Reject vectors whose dimension differs from what the model was fitted on.
pub(crate) fn check_dimension(
    classifier: &dyn BinaryClassifier,
    features: &FeatureVector,
) -> Result<()> {
    if features.dimension() != classifier.n_features() {
        return Err(SpamcheckError::dimension_mismatch(
            classifier.name(),
            classifier.n_features(),
            features.dimension(),
        ));
    }
    Ok(())
}

/// Which of the two models to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSelector {
    /// Support-vector classifier
    #[default]
    Primary,
    /// Naive Bayes classifier
    Secondary,
}

impl ModelSelector {
    pub const ALL: [ModelSelector; 2] = [ModelSelector::Primary, ModelSelector::Secondary];

    /// Name shown to users.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelSelector::Primary => "SVC Classifier",
            ModelSelector::Secondary => "Naive Bayes",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelSelector::Primary => "primary",
            ModelSelector::Secondary => "secondary",
        }
    }
}

impl fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelSelector {
    type Err = SpamcheckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "svc" => Ok(ModelSelector::Primary),
            "secondary" | "nb" | "naive_bayes" => Ok(ModelSelector::Secondary),
            other => Err(SpamcheckError::config(format!("Unknown model: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_indices() {
        assert_eq!(Label::NotSpam.index(), 0);
        assert_eq!(Label::Spam.index(), 1);
        assert_eq!(Label::from_index(1), Some(Label::Spam));
        assert_eq!(Label::from_index(2), None);
        assert_eq!(Label::Spam.to_string(), "SPAM");
        assert_eq!(serde_json::to_string(&Label::NotSpam).unwrap(), "\"NOT_SPAM\"");
    }

    #[test]
    fn test_probabilities_validation() {
        let p = ClassProbabilities::new(0.25, 0.75).unwrap();
        assert_eq!(p.get(Label::Spam), 0.75);
        assert_eq!(p.as_array(), [0.25, 0.75]);

        assert!(ClassProbabilities::new(0.5, 0.5 + 5e-7).is_ok());
        assert!(ClassProbabilities::new(0.5, 0.6).is_err());
        assert!(ClassProbabilities::new(-0.1, 1.1).is_err());
        assert!(ClassProbabilities::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_prediction_confidence() {
        let prediction = Prediction {
            label: Label::NotSpam,
            probabilities: ClassProbabilities::new(0.8, 0.2).unwrap(),
        };
        assert_eq!(prediction.confidence(), 0.8);
    }

    #[test]
    fn test_model_selector_parsing() {
        assert_eq!("svc".parse::<ModelSelector>().unwrap(), ModelSelector::Primary);
        assert_eq!("PRIMARY".parse::<ModelSelector>().unwrap(), ModelSelector::Primary);
        assert_eq!("nb".parse::<ModelSelector>().unwrap(), ModelSelector::Secondary);
        assert_eq!(
            "naive_bayes".parse::<ModelSelector>().unwrap(),
            ModelSelector::Secondary
        );
        assert!("forest".parse::<ModelSelector>().is_err());
    }

    #[test]
    fn test_model_selector_names() {
        assert_eq!(ModelSelector::Primary.display_name(), "SVC Classifier");
        assert_eq!(ModelSelector::Secondary.to_string(), "Naive Bayes");
        assert_eq!(ModelSelector::default(), ModelSelector::Primary);
        assert_eq!(
            serde_json::to_string(&ModelSelector::Secondary).unwrap(),
            "\"secondary\""
        );
    }
}
