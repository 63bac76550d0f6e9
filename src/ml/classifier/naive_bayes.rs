//! Naive Bayes classifiers evaluated from fitted log probabilities.

use crate::error::{Result, SpamcheckError};
use crate::ml::classifier::{BinaryClassifier, Label, check_dimension};
use crate::ml::features::FeatureVector;

/// Event model of a fitted naive Bayes classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NaiveBayesVariant {
    /// Feature counts (or TF-IDF weights) drawn from a multinomial.
    Multinomial,
    /// Binary occurrence features. With `binarize: Some(t)` inputs above `t`
    /// count as present; with `None` inputs are assumed to be binary already.
    Bernoulli { binarize: Option<f64> },
}

/// A fitted two-class naive Bayes classifier.
///
/// # Examples
///
/// ```
/// use spamcheck::ml::classifier::{BinaryClassifier, Label, NaiveBayesClassifier};
/// use spamcheck::ml::features::FeatureVector;
///
/// let nb = NaiveBayesClassifier::multinomial(
///     [0.5f64.ln(), 0.5f64.ln()],
///     [vec![0.9f64.ln(), 0.1f64.ln()], vec![0.1f64.ln(), 0.9f64.ln()]],
/// )
/// .unwrap();
///
/// let x = FeatureVector::new(vec![0.0, 1.0]);
/// assert_eq!(nb.predict(&x).unwrap(), Label::Spam);
/// ```
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    variant: NaiveBayesVariant,
    class_log_prior: [f64; 2],
    feature_log_prob: [Vec<f64>; 2],
    /// `ln(1 - p)` per class and feature, Bernoulli only.
    neg_log_prob: Option<[Vec<f64>; 2]>,
}

impl NaiveBayesClassifier {
    pub fn multinomial(class_log_prior: [f64; 2], feature_log_prob: [Vec<f64>; 2]) -> Result<Self> {
        Self::build(NaiveBayesVariant::Multinomial, class_log_prior, feature_log_prob)
    }

    pub fn bernoulli(
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
        binarize: Option<f64>,
    ) -> Result<Self> {
        if binarize.is_some_and(|t| !t.is_finite()) {
            return Err(SpamcheckError::artifact("binarize threshold must be finite"));
        }
        Self::build(
            NaiveBayesVariant::Bernoulli { binarize },
            class_log_prior,
            feature_log_prob,
        )
    }

    fn build(
        variant: NaiveBayesVariant,
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    ) -> Result<Self> {
        if class_log_prior.iter().any(|p| p.is_nan() || *p > 0.0) {
            return Err(SpamcheckError::artifact(
                "class_log_prior must hold log probabilities",
            ));
        }

        let n_features = feature_log_prob[0].len();
        if feature_log_prob[1].len() != n_features {
            return Err(SpamcheckError::dimension_mismatch(
                "feature_log_prob",
                n_features,
                feature_log_prob[1].len(),
            ));
        }

        let is_bernoulli = matches!(variant, NaiveBayesVariant::Bernoulli { .. });
        let valid = |p: &f64| {
            if is_bernoulli {
                p.is_finite() && *p < 0.0
            } else {
                !p.is_nan() && *p <= 0.0
            }
        };
        if !feature_log_prob.iter().flatten().all(valid) {
            return Err(SpamcheckError::artifact(
                "feature_log_prob must hold log probabilities",
            ));
        }

        let neg_log_prob = is_bernoulli.then(|| {
            feature_log_prob
                .clone()
                .map(|row| row.iter().map(|p| (-p.exp()).ln_1p()).collect())
        });

        Ok(NaiveBayesClassifier {
            variant,
            class_log_prior,
            feature_log_prob,
            neg_log_prob,
        })
    }

    pub fn variant(&self) -> NaiveBayesVariant {
        self.variant
    }

    /// Unnormalized log posterior per class.
    pub fn joint_log_likelihood(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        check_dimension(self, features)?;

        let jll = match (&self.variant, &self.neg_log_prob) {
            (NaiveBayesVariant::Bernoulli { binarize }, Some(neg_log_prob)) => {
                let x: Vec<f64> = match binarize {
                    Some(threshold) => features
                        .values()
                        .iter()
                        .map(|v| if v > threshold { 1.0 } else { 0.0 })
                        .collect(),
                    None => features.values().to_vec(),
                };
                let x = FeatureVector::new(x);

                [0, 1].map(|c| {
                    let delta: Vec<f64> = self.feature_log_prob[c]
                        .iter()
                        .zip(&neg_log_prob[c])
                        .map(|(p, q)| p - q)
                        .collect();
                    x.dot(&delta) + self.class_log_prior[c] + neg_log_prob[c].iter().sum::<f64>()
                })
            }
            _ => [0, 1].map(|c| features.dot(&self.feature_log_prob[c]) + self.class_log_prior[c]),
        };

        if jll.iter().any(|v| v.is_nan()) {
            return Err(SpamcheckError::model("Naive Bayes log likelihood is NaN"));
        }
        Ok(jll)
    }
}

fn log_sum_exp(values: &[f64; 2]) -> f64 {
    let max = values[0].max(values[1]);
    if max.is_infinite() {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

impl BinaryClassifier for NaiveBayesClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let jll = self.joint_log_likelihood(features)?;
        // Ties go to the first class.
        Ok(if jll[1] > jll[0] {
            Label::Spam
        } else {
            Label::NotSpam
        })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        let jll = self.joint_log_likelihood(features)?;
        let log_prob_x = log_sum_exp(&jll);
        if !log_prob_x.is_finite() {
            return Err(SpamcheckError::model(
                "Naive Bayes evidence is not finite",
            ));
        }
        Ok(jll.map(|v| (v - log_prob_x).exp()))
    }

    fn n_features(&self) -> usize {
        self.feature_log_prob[0].len()
    }

    fn name(&self) -> &'static str {
        match self.variant {
            NaiveBayesVariant::Multinomial => "multinomial_nb",
            NaiveBayesVariant::Bernoulli { .. } => "bernoulli_nb",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ln(values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| v.ln()).collect()
    }

    fn multinomial() -> NaiveBayesClassifier {
        NaiveBayesClassifier::multinomial(
            [0.75f64.ln(), 0.25f64.ln()],
            [ln(&[0.6, 0.3, 0.1]), ln(&[0.1, 0.2, 0.7])],
        )
        .unwrap()
    }

    #[test]
    fn test_multinomial_joint_log_likelihood() {
        let nb = multinomial();
        let x = FeatureVector::new(vec![0.0, 1.0, 2.0]);
        let jll = nb.joint_log_likelihood(&x).unwrap();

        let expected_ham = 0.75f64.ln() + 0.3f64.ln() + 2.0 * 0.1f64.ln();
        let expected_spam = 0.25f64.ln() + 0.2f64.ln() + 2.0 * 0.7f64.ln();
        assert!((jll[0] - expected_ham).abs() < 1e-12);
        assert!((jll[1] - expected_spam).abs() < 1e-12);
        assert_eq!(nb.predict(&x).unwrap(), Label::Spam);
    }

    #[test]
    fn test_zero_vector_falls_back_to_prior() {
        let nb = multinomial();
        let p = nb.predict_proba(&FeatureVector::zeros(3)).unwrap();

        assert!((p[0] - 0.75).abs() < 1e-12);
        assert!((p[1] - 0.25).abs() < 1e-12);
        assert_eq!(nb.predict(&FeatureVector::zeros(3)).unwrap(), Label::NotSpam);
    }

    #[test]
    fn test_tie_goes_to_not_spam() {
        let nb = NaiveBayesClassifier::multinomial(
            [0.5f64.ln(), 0.5f64.ln()],
            [ln(&[0.5, 0.5]), ln(&[0.5, 0.5])],
        )
        .unwrap();
        let x = FeatureVector::new(vec![1.0, 1.0]);

        assert_eq!(nb.predict(&x).unwrap(), Label::NotSpam);
        let p = nb.predict_proba(&x).unwrap();
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert!((p[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities_sum_to_one_for_extreme_inputs() {
        let nb = multinomial();
        let x = FeatureVector::new(vec![0.0, 0.0, 500.0]);
        let p = nb.predict_proba(&x).unwrap();

        assert!((p[0] + p[1] - 1.0).abs() < 1e-9);
        assert!(p[1] > 0.999);
    }

    #[test]
    fn test_bernoulli() {
        let nb = NaiveBayesClassifier::bernoulli(
            [0.5f64.ln(), 0.5f64.ln()],
            [ln(&[0.8, 0.1]), ln(&[0.2, 0.6])],
            Some(0.0),
        )
        .unwrap();

        // Weights above the threshold become 1.
        let x = FeatureVector::new(vec![0.0, 0.37]);
        let jll = nb.joint_log_likelihood(&x).unwrap();

        let expected_ham = 0.5f64.ln() + 0.2f64.ln() + 0.1f64.ln();
        let expected_spam = 0.5f64.ln() + 0.8f64.ln() + 0.6f64.ln();
        assert!((jll[0] - expected_ham).abs() < 1e-12);
        assert!((jll[1] - expected_spam).abs() < 1e-12);
        assert_eq!(nb.predict(&x).unwrap(), Label::Spam);
        assert_eq!(nb.name(), "bernoulli_nb");
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(NaiveBayesClassifier::multinomial([0.1, 0.0], [vec![-1.0], vec![-1.0]]).is_err());
        assert!(NaiveBayesClassifier::multinomial([-1.0, -1.0], [vec![-1.0], vec![]]).is_err());
        assert!(NaiveBayesClassifier::multinomial([-1.0, -1.0], [vec![0.5], vec![-1.0]]).is_err());
        assert!(NaiveBayesClassifier::bernoulli([-1.0, -1.0], [vec![0.0], vec![-1.0]], None).is_err());
        assert!(
            NaiveBayesClassifier::bernoulli([-1.0, -1.0], [vec![-1.0], vec![-1.0]], Some(f64::NAN))
                .is_err()
        );
    }

    #[test]
    fn test_dimension_mismatch() {
        let nb = multinomial();
        assert!(matches!(
            nb.predict(&FeatureVector::zeros(4)),
            Err(SpamcheckError::DimensionMismatch { expected: 3, actual: 4, .. })
        ));
    }
}
