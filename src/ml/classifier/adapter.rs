//! Selects one of the two fitted models per request.

use std::sync::Arc;

use crate::error::{Result, SpamcheckError};
use crate::ml::classifier::{
    BinaryClassifier, ClassProbabilities, ModelSelector, Prediction, check_dimension,
};
use crate::ml::features::FeatureVector;

/// The PRIMARY and SECONDARY classifiers behind one interface.
///
/// Both models are immutable and shared; the adapter is cheap to clone.
#[derive(Debug, Clone)]
pub struct ClassifierAdapter {
    primary: Arc<dyn BinaryClassifier>,
    secondary: Arc<dyn BinaryClassifier>,
}

impl ClassifierAdapter {
    /// Both models must have been fitted on the same feature dimension.
    pub fn new(
        primary: Arc<dyn BinaryClassifier>,
        secondary: Arc<dyn BinaryClassifier>,
    ) -> Result<Self> {
        if primary.n_features() != secondary.n_features() {
            return Err(SpamcheckError::dimension_mismatch(
                secondary.name(),
                primary.n_features(),
                secondary.n_features(),
            ));
        }
        Ok(ClassifierAdapter { primary, secondary })
    }

    pub fn model(&self, selector: ModelSelector) -> &dyn BinaryClassifier {
        match selector {
            ModelSelector::Primary => self.primary.as_ref(),
            ModelSelector::Secondary => self.secondary.as_ref(),
        }
    }

    /// Shared feature dimension of both models.
    pub fn n_features(&self) -> usize {
        self.primary.n_features()
    }

    /// Predict the label and class probabilities of `features` with the
    /// selected model.
    pub fn classify(&self, features: &FeatureVector, selector: ModelSelector) -> Result<Prediction> {
        let model = self.model(selector);
        check_dimension(model, features)?;

        let label = model.predict(features)?;
        let [not_spam, spam] = model.predict_proba(features)?;
        let probabilities = ClassProbabilities::new(not_spam, spam)?;

        tracing::debug!(
            model = model.name(),
            label = %label,
            p_spam = spam,
            "classified feature vector"
        );

        Ok(Prediction {
            label,
            probabilities,
        })
    }
}
