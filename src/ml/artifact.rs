//! JSON artifacts exported from the offline training pipeline.
//!
//! Artifacts are read once at startup. Every failure, whether I/O, JSON
//! syntax or a parameter that does not validate, becomes
//! [`SpamcheckError::ArtifactLoad`] naming the artifact and its path.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamcheckError};
use crate::ml::classifier::{
    BinaryClassifier, Kernel, NaiveBayesClassifier, SparseVector, SupportVectorClassifier,
};
use crate::ml::vectorizer::tfidf::{DEFAULT_TOKEN_PATTERN, Norm, TfIdfVectorizer};

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_degree() -> u32 {
    3
}

fn default_binarize() -> Option<f64> {
    Some(0.0)
}

/// Fitted TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfArtifact {
    pub vocabulary: HashMap<String, usize>,
    /// `null` when the vectorizer was fitted with `use_idf=False`.
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub stop_words: Vec<String>,
}

impl TfIdfArtifact {
    pub fn into_vectorizer(self) -> Result<TfIdfVectorizer> {
        let vocabulary: AHashMap<String, usize> = self.vocabulary.into_iter().collect();
        let (min_n, max_n) = self.ngram_range;

        Ok(TfIdfVectorizer::new(vocabulary, self.idf)?
            .with_token_pattern(&self.token_pattern)?
            .with_ngram_range(min_n, max_n)?
            .with_lowercase(self.lowercase)
            .with_stop_words(self.stop_words)
            .with_binary(self.binary)
            .with_sublinear_tf(self.sublinear_tf)
            .with_norm(self.norm))
    }
}

/// Kernel names as exported by scikit-learn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    Linear,
    Rbf,
    Poly,
    Sigmoid,
}

/// One support vector in sparse form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVectorArtifact {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

/// Fitted binary SVC with Platt scaling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvcArtifact {
    pub kernel: KernelKind,
    /// The numeric gamma actually used in fitting.
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub coef0: f64,
    #[serde(default = "default_degree")]
    pub degree: u32,
    pub n_features: usize,
    pub support_vectors: Vec<SparseVectorArtifact>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    pub prob_a: f64,
    pub prob_b: f64,
    #[serde(default)]
    pub classes: Option<Vec<i64>>,
}

impl SvcArtifact {
    fn kernel(&self) -> Result<Kernel> {
        let gamma = || {
            self.gamma.ok_or_else(|| {
                SpamcheckError::artifact(format!(
                    "{:?} kernel requires gamma",
                    self.kernel
                ))
            })
        };

        Ok(match self.kernel {
            KernelKind::Linear => Kernel::Linear,
            KernelKind::Rbf => Kernel::Rbf { gamma: gamma()? },
            KernelKind::Poly => Kernel::Poly {
                gamma: gamma()?,
                coef0: self.coef0,
                degree: self.degree,
            },
            KernelKind::Sigmoid => Kernel::Sigmoid {
                gamma: gamma()?,
                coef0: self.coef0,
            },
        })
    }

    pub fn into_classifier(self) -> Result<SupportVectorClassifier> {
        check_classes(self.classes.as_deref())?;
        let kernel = self.kernel()?;
        let n_features = self.n_features;

        let support_vectors = self
            .support_vectors
            .into_iter()
            .map(|sv| SparseVector::new(sv.indices, sv.values, n_features))
            .collect::<Result<Vec<_>>>()?;

        SupportVectorClassifier::new(
            kernel,
            n_features,
            support_vectors,
            self.dual_coef,
            self.intercept,
            self.prob_a,
            self.prob_b,
        )
    }
}

/// Fitted multinomial or Bernoulli naive Bayes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesArtifact {
    pub n_features: usize,
    pub class_log_prior: [f64; 2],
    pub feature_log_prob: [Vec<f64>; 2],
    /// Bernoulli only.
    #[serde(default = "default_binarize")]
    pub binarize: Option<f64>,
    #[serde(default)]
    pub classes: Option<Vec<i64>>,
}

impl NaiveBayesArtifact {
    fn check(&self) -> Result<()> {
        check_classes(self.classes.as_deref())?;
        let actual = self.feature_log_prob[0].len();
        if actual != self.n_features {
            return Err(SpamcheckError::dimension_mismatch(
                "feature_log_prob",
                self.n_features,
                actual,
            ));
        }
        Ok(())
    }
}

/// Any supported classifier, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Svc(SvcArtifact),
    MultinomialNb(NaiveBayesArtifact),
    BernoulliNb(NaiveBayesArtifact),
}

impl ClassifierArtifact {
    pub fn into_classifier(self) -> Result<Arc<dyn BinaryClassifier>> {
        Ok(match self {
            ClassifierArtifact::Svc(svc) => Arc::new(svc.into_classifier()?),
            ClassifierArtifact::MultinomialNb(nb) => {
                nb.check()?;
                Arc::new(NaiveBayesClassifier::multinomial(
                    nb.class_log_prior,
                    nb.feature_log_prob,
                )?)
            }
            ClassifierArtifact::BernoulliNb(nb) => {
                nb.check()?;
                Arc::new(NaiveBayesClassifier::bernoulli(
                    nb.class_log_prior,
                    nb.feature_log_prob,
                    nb.binarize,
                )?)
            }
        })
    }
}

/// Only the `[0, 1]` label encoding is supported.
fn check_classes(classes: Option<&[i64]>) -> Result<()> {
    match classes {
        None | Some([0, 1]) => Ok(()),
        Some(other) => Err(SpamcheckError::artifact(format!(
            "Expected classes [0, 1], found {other:?}"
        ))),
    }
}

fn read_json<T: DeserializeOwned>(artifact: &str, path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| SpamcheckError::artifact_load(artifact, path, e))?;
    serde_json::from_str(&content).map_err(|e| SpamcheckError::artifact_load(artifact, path, e))
}

/// Load and validate the vectorizer artifact.
pub fn load_vectorizer(path: &Path) -> Result<TfIdfVectorizer> {
    let artifact: TfIdfArtifact = read_json("vectorizer", path)?;
    let vectorizer = artifact
        .into_vectorizer()
        .map_err(|e| SpamcheckError::artifact_load("vectorizer", path, e))?;

    tracing::info!(
        path = %path.display(),
        vocabulary_size = vectorizer.vocabulary_size(),
        "loaded vectorizer"
    );
    Ok(vectorizer)
}

/// Load and validate a classifier artifact. `artifact` names it in errors.
pub fn load_classifier(artifact: &str, path: &Path) -> Result<Arc<dyn BinaryClassifier>> {
    let parsed: ClassifierArtifact = read_json(artifact, path)?;
    let classifier = parsed
        .into_classifier()
        .map_err(|e| SpamcheckError::artifact_load(artifact, path, e))?;

    tracing::info!(
        path = %path.display(),
        model = classifier.name(),
        n_features = classifier.n_features(),
        "loaded {artifact} classifier"
    );
    Ok(classifier)
}
