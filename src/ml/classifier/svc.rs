//! Support-vector classifier evaluated from exported libsvm parameters.
//!
//! The decision function uses scikit-learn's public sign convention:
//!
//! ```text
//! f(x) = Σ dual_coef[i] · K(sv[i], x) + intercept
//! ```
//!
//! so `f(x) >= 0` predicts the spam class. Probabilities come from libsvm's
//! Platt scaling, which is fitted on the internal decision value `-f(x)` and
//! yields the probability of class 0.

use crate::error::{Result, SpamcheckError};
use crate::ml::classifier::{BinaryClassifier, Label, check_dimension};
use crate::ml::features::FeatureVector;

/// libsvm clamps pairwise probabilities into `[MIN_PROBABILITY, 1 - MIN_PROBABILITY]`.
const MIN_PROBABILITY: f64 = 1e-7;

/// Kernel function of a fitted SVC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Poly { gamma: f64, coef0: f64, degree: u32 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Linear => "linear",
            Kernel::Rbf { .. } => "rbf",
            Kernel::Poly { .. } => "poly",
            Kernel::Sigmoid { .. } => "sigmoid",
        }
    }

    fn validate(&self) -> Result<()> {
        let finite = match *self {
            Kernel::Linear => true,
            Kernel::Rbf { gamma } => gamma.is_finite(),
            Kernel::Poly { gamma, coef0, .. } | Kernel::Sigmoid { gamma, coef0 } => {
                gamma.is_finite() && coef0.is_finite()
            }
        };
        if finite {
            Ok(())
        } else {
            Err(SpamcheckError::artifact(format!(
                "Kernel parameters of {} are not finite",
                self.name()
            )))
        }
    }

    /// `K(sv, x)`. `x_squared_norm` is `|x|²`, computed once per request.
    fn evaluate(&self, sv: &SparseVector, x: &FeatureVector, x_squared_norm: f64) -> f64 {
        let dot = sv.dot(x);
        match *self {
            Kernel::Linear => dot,
            Kernel::Rbf { gamma } => {
                let distance = (x_squared_norm + sv.squared_norm - 2.0 * dot).max(0.0);
                (-gamma * distance).exp()
            }
            Kernel::Poly {
                gamma,
                coef0,
                degree,
            } => (gamma * dot + coef0).powi(degree as i32),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * dot + coef0).tanh(),
        }
    }
}

/// A support vector stored as sorted `(index, value)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
    squared_norm: f64,
}

impl SparseVector {
    /// Indices must be strictly increasing and lie below `dimension`.
    pub fn new(indices: Vec<usize>, values: Vec<f64>, dimension: usize) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(SpamcheckError::artifact(format!(
                "Support vector has {} indices but {} values",
                indices.len(),
                values.len()
            )));
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SpamcheckError::artifact(
                "Support vector indices must be strictly increasing",
            ));
        }
        if let Some(&last) = indices.last() {
            if last >= dimension {
                return Err(SpamcheckError::artifact(format!(
                    "Support vector index {last} is out of range for {dimension} features"
                )));
            }
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SpamcheckError::artifact("Support vector values must be finite"));
        }

        let squared_norm = values.iter().map(|v| v * v).sum();
        Ok(SparseVector {
            indices,
            values,
            squared_norm,
        })
    }

    /// Convert a dense row, dropping zeros.
    pub fn from_dense(values: &[f64]) -> Result<Self> {
        let (indices, values) = values
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| *v != 0.0)
            .unzip();
        Self::new(indices, values, usize::MAX)
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    fn dot(&self, x: &FeatureVector) -> f64 {
        let dense = x.values();
        self.indices
            .iter()
            .zip(&self.values)
            .map(|(&i, v)| dense.get(i).map_or(0.0, |x| v * x))
            .sum()
    }
}

/// Platt sigmoid exactly as libsvm's `sigmoid_predict`, arranged to avoid overflow.
fn sigmoid_predict(decision_value: f64, a: f64, b: f64) -> f64 {
    let f_apb = decision_value * a + b;
    if f_apb >= 0.0 {
        (-f_apb).exp() / (1.0 + (-f_apb).exp())
    } else {
        1.0 / (1.0 + f_apb.exp())
    }
}

/// A fitted binary support-vector classifier.
///
/// # Examples
///
/// ```
/// use spamcheck::ml::classifier::{BinaryClassifier, Kernel, Label, SparseVector, SupportVectorClassifier};
/// use spamcheck::ml::features::FeatureVector;
///
/// let svc = SupportVectorClassifier::new(
///     Kernel::Linear,
///     2,
///     vec![
///         SparseVector::new(vec![0], vec![1.0], 2).unwrap(),
///         SparseVector::new(vec![1], vec![1.0], 2).unwrap(),
///     ],
///     vec![1.0, -1.0],
///     0.0,
///     -2.0,
///     0.0,
/// )
/// .unwrap();
///
/// let spammy = FeatureVector::new(vec![1.0, 0.0]);
/// assert_eq!(svc.predict(&spammy).unwrap(), Label::Spam);
/// assert!(svc.predict_proba(&spammy).unwrap()[1] > 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct SupportVectorClassifier {
    kernel: Kernel,
    n_features: usize,
    support_vectors: Vec<SparseVector>,
    dual_coef: Vec<f64>,
    intercept: f64,
    prob_a: f64,
    prob_b: f64,
}

impl SupportVectorClassifier {
    pub fn new(
        kernel: Kernel,
        n_features: usize,
        support_vectors: Vec<SparseVector>,
        dual_coef: Vec<f64>,
        intercept: f64,
        prob_a: f64,
        prob_b: f64,
    ) -> Result<Self> {
        kernel.validate()?;

        if support_vectors.is_empty() {
            return Err(SpamcheckError::artifact("SVC has no support vectors"));
        }
        if support_vectors.len() != dual_coef.len() {
            return Err(SpamcheckError::artifact(format!(
                "SVC has {} support vectors but {} dual coefficients",
                support_vectors.len(),
                dual_coef.len()
            )));
        }
        if let Some(sv) = support_vectors
            .iter()
            .find(|sv| sv.indices.last().is_some_and(|&i| i >= n_features))
        {
            return Err(SpamcheckError::artifact(format!(
                "Support vector with {} entries exceeds {n_features} features",
                sv.nnz()
            )));
        }
        if dual_coef.iter().any(|c| !c.is_finite())
            || !intercept.is_finite()
            || !prob_a.is_finite()
            || !prob_b.is_finite()
        {
            return Err(SpamcheckError::artifact(
                "SVC coefficients must be finite numbers",
            ));
        }

        Ok(SupportVectorClassifier {
            kernel,
            n_features,
            support_vectors,
            dual_coef,
            intercept,
            prob_a,
            prob_b,
        })
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn n_support_vectors(&self) -> usize {
        self.support_vectors.len()
    }

    /// Signed distance from the separating surface. Non-negative means spam.
    pub fn decision_function(&self, features: &FeatureVector) -> Result<f64> {
        check_dimension(self, features)?;

        let x_squared_norm = features.squared_norm();
        let sum: f64 = self
            .support_vectors
            .iter()
            .zip(&self.dual_coef)
            .map(|(sv, coef)| coef * self.kernel.evaluate(sv, features, x_squared_norm))
            .sum();
        let decision = sum + self.intercept;

        if !decision.is_finite() {
            return Err(SpamcheckError::model("SVC decision value is not finite"));
        }
        Ok(decision)
    }
}

impl BinaryClassifier for SupportVectorClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let decision = self.decision_function(features)?;
        Ok(if decision >= 0.0 {
            Label::Spam
        } else {
            Label::NotSpam
        })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        let decision = self.decision_function(features)?;
        let not_spam = sigmoid_predict(-decision, self.prob_a, self.prob_b)
            .clamp(MIN_PROBABILITY, 1.0 - MIN_PROBABILITY);
        Ok([not_spam, 1.0 - not_spam])
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &'static str {
        "svc"
    }

    fn describe(&self) -> String {
        format!(
            "svc (kernel={}, {} support vectors, {} features)",
            self.kernel.name(),
            self.support_vectors.len(),
            self.n_features
        )
    }
}
