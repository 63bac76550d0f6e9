//! The classification pipeline.
//!
//! [`SpamPipeline`] owns the normalizer, the vectorizer and both classifiers.
//! It is built once, either from artifacts on disk or from components, and
//! then shared freely: every method takes `&self` and nothing is mutated
//! after construction.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::analysis::analyzer::{MessageNormalizer, NormalizedText};
use crate::error::{ClassificationError, Result, SpamcheckError, truncate_diagnostic};
use crate::ml::artifact::{load_classifier, load_vectorizer};
use crate::ml::classifier::{BinaryClassifier, ClassifierAdapter, ModelSelector};
use crate::ml::features::FeatureVector;
use crate::ml::vectorizer::Vectorizer;
use crate::pipeline::config::{ArtifactPaths, PipelineConfig, SpamcheckConfig};
use crate::pipeline::result::{ClassificationResult, ConfidenceTier};

/// Result of a single classification request.
pub type ClassificationOutcome = std::result::Result<ClassificationResult, ClassificationError>;

/// A ready-to-use spam classification pipeline.
///
/// # Examples
///
/// ```no_run
/// use spamcheck::ml::classifier::ModelSelector;
/// use spamcheck::pipeline::SpamPipeline;
///
/// let pipeline = SpamPipeline::load_artifacts(
///     "best_models/tfidf.json",
///     "best_models/svc_best.json",
///     "best_models/nb_model.json",
/// )?;
///
/// match pipeline.classify_message("Free entry to win a prize!", ModelSelector::Primary) {
///     Ok(result) => println!("{} ({:.1}%)", result.label, result.confidence),
///     Err(e) => eprintln!("{e}"),
/// }
/// # Ok::<(), spamcheck::error::SpamcheckError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SpamPipeline {
    normalizer: MessageNormalizer,
    vectorizer: Arc<dyn Vectorizer>,
    classifiers: ClassifierAdapter,
    config: PipelineConfig,
}

impl SpamPipeline {
    /// Assemble a pipeline from loaded components.
    ///
    /// Fails when the configuration is invalid or when the vectorizer and the
    /// two classifiers disagree on the feature dimension.
    pub fn new(
        vectorizer: Arc<dyn Vectorizer>,
        primary: Arc<dyn BinaryClassifier>,
        secondary: Arc<dyn BinaryClassifier>,
        config: PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;

        let classifiers = ClassifierAdapter::new(primary, secondary)?;
        if vectorizer.dimension() != classifiers.n_features() {
            return Err(SpamcheckError::dimension_mismatch(
                "classifiers",
                classifiers.n_features(),
                vectorizer.dimension(),
            ));
        }

        Ok(SpamPipeline {
            normalizer: MessageNormalizer::new()?,
            vectorizer,
            classifiers,
            config,
        })
    }

    /// Load the three artifacts with the default pipeline configuration.
    pub fn load_artifacts<V, P, S>(vectorizer_path: V, primary_path: P, secondary_path: S) -> Result<Self>
    where
        V: AsRef<Path>,
        P: AsRef<Path>,
        S: AsRef<Path>,
    {
        let paths = ArtifactPaths {
            vectorizer: vectorizer_path.as_ref().to_path_buf(),
            primary_model: primary_path.as_ref().to_path_buf(),
            secondary_model: secondary_path.as_ref().to_path_buf(),
        };
        Self::load_with_config(&paths, PipelineConfig::default())
    }

    /// Load the artifacts named in `config`.
    pub fn from_config(config: &SpamcheckConfig) -> Result<Self> {
        Self::load_with_config(&config.artifacts, config.pipeline.clone())
    }

    /// Load the artifacts at `paths` with a custom pipeline configuration.
    pub fn load_with_config(paths: &ArtifactPaths, config: PipelineConfig) -> Result<Self> {
        let vectorizer = load_vectorizer(&paths.vectorizer)?;
        let primary = load_classifier("primary model", &paths.primary_model)?;
        let secondary = load_classifier("secondary model", &paths.secondary_model)?;

        let pipeline = Self::new(Arc::new(vectorizer), primary, secondary, config)?;
        tracing::info!(
            dimension = pipeline.dimension(),
            primary = pipeline.classifiers.model(ModelSelector::Primary).name(),
            secondary = pipeline.classifiers.model(ModelSelector::Secondary).name(),
            "pipeline ready"
        );
        Ok(pipeline)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    pub fn classifiers(&self) -> &ClassifierAdapter {
        &self.classifiers
    }

    /// Feature dimension shared by the vectorizer and both models.
    pub fn dimension(&self) -> usize {
        self.vectorizer.dimension()
    }

    /// Normalize a message without classifying it.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        self.normalizer.normalize(text)
    }

    /// Classify one message with the selected model.
    ///
    /// Input is validated before any model runs. Faults inside vectorization
    /// or a model, panics included, are returned as
    /// [`ClassificationError::VectorizationFailure`] or
    /// [`ClassificationError::ClassificationFailure`] with a truncated
    /// diagnostic.
    pub fn classify_message(&self, raw_text: &str, selector: ModelSelector) -> ClassificationOutcome {
        let message = self.validate(raw_text)?;
        let normalized = self.normalizer.normalize(message);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(normalized, selector)));

        match outcome {
            Ok(Ok(result)) => {
                tracing::debug!(
                    model = selector.as_str(),
                    label = %result.label,
                    confidence = result.confidence,
                    tokens = result.token_count,
                    "classified message"
                );
                Ok(result)
            }
            Ok(Err(e)) => {
                tracing::warn!(model = selector.as_str(), error = %e, "classification failed");
                Err(e)
            }
            Err(payload) => {
                let description = panic_message(payload.as_ref());
                tracing::warn!(model = selector.as_str(), panic = %description, "model panicked");
                Err(ClassificationError::ClassificationFailure {
                    diagnostic: self.diagnostic(&description),
                })
            }
        }
    }

    /// Classify many messages in parallel. Results keep the input order.
    pub fn classify_batch<S>(&self, messages: &[S], selector: ModelSelector) -> Vec<ClassificationOutcome>
    where
        S: AsRef<str> + Sync,
    {
        messages
            .par_iter()
            .map(|message| self.classify_message(message.as_ref(), selector))
            .collect()
    }

    fn validate<'a>(&self, raw_text: &'a str) -> std::result::Result<&'a str, ClassificationError> {
        let message = raw_text.trim();
        if message.is_empty() {
            return Err(ClassificationError::EmptyInput);
        }

        let length = message.chars().count();
        if length < self.config.min_message_length {
            return Err(ClassificationError::TooShort {
                length,
                min_length: self.config.min_message_length,
            });
        }

        Ok(message)
    }

    fn evaluate(&self, normalized: NormalizedText, selector: ModelSelector) -> ClassificationOutcome {
        let features = self.vectorize(&normalized)?;

        let prediction = self
            .classifiers
            .classify(&features, selector)
            .map_err(|e| ClassificationError::ClassificationFailure {
                diagnostic: self.diagnostic(&e.to_string()),
            })?;

        let confidence = prediction.confidence() * 100.0;
        if !(0.0..=100.0).contains(&confidence) {
            return Err(ClassificationError::ClassificationFailure {
                diagnostic: self.diagnostic(&format!("Confidence {confidence} is out of range")),
            });
        }

        Ok(ClassificationResult {
            label: prediction.label,
            confidence,
            confidence_tier: ConfidenceTier::from_confidence(confidence, &self.config.thresholds),
            model_used: selector,
            token_count: normalized.token_count(),
            probabilities: prediction.probabilities,
            normalized_text: normalized,
        })
    }

    fn vectorize(&self, normalized: &NormalizedText) -> std::result::Result<FeatureVector, ClassificationError> {
        let features = self
            .vectorizer
            .transform(normalized)
            .map_err(|e| ClassificationError::VectorizationFailure {
                diagnostic: self.diagnostic(&e.to_string()),
            })?;

        let expected = self.classifiers.n_features();
        if features.dimension() != expected {
            let e = SpamcheckError::dimension_mismatch("classifiers", expected, features.dimension());
            return Err(ClassificationError::VectorizationFailure {
                diagnostic: self.diagnostic(&e.to_string()),
            });
        }

        Ok(features)
    }

    fn diagnostic(&self, description: &str) -> String {
        truncate_diagnostic(description, self.config.diagnostic_max_chars)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::classifier::{
        Kernel, Label, NaiveBayesClassifier, SparseVector, SupportVectorClassifier,
    };
    use crate::ml::vectorizer::TfIdfVectorizer;

    const TERMS: &[&str] = &["claim", "click", "congratul", "lunch", "meet", "prize"];

    fn vectorizer() -> Arc<dyn Vectorizer> {
        let vocabulary = TERMS
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();
        Arc::new(TfIdfVectorizer::new(vocabulary, Some(vec![1.0; TERMS.len()])).unwrap())
    }

    fn svc() -> Arc<dyn BinaryClassifier> {
        // Spam terms pull the decision up, ham terms pull it down.
        let support_vectors = vec![
            SparseVector::new(vec![0, 1, 2, 5], vec![0.5; 4], 6).unwrap(),
            SparseVector::new(vec![3, 4], vec![0.7; 2], 6).unwrap(),
        ];
        Arc::new(
            SupportVectorClassifier::new(
                Kernel::Linear,
                6,
                support_vectors,
                vec![4.0, -4.0],
                -0.2,
                -3.0,
                0.0,
            )
            .unwrap(),
        )
    }

    fn nb() -> Arc<dyn BinaryClassifier> {
        let ham = [0.05, 0.05, 0.05, 0.35, 0.35, 0.15];
        let spam = [0.2, 0.2, 0.2, 0.05, 0.05, 0.3];
        Arc::new(
            NaiveBayesClassifier::multinomial(
                [0.6f64.ln(), 0.4f64.ln()],
                [ham.map(f64::ln).to_vec(), spam.map(f64::ln).to_vec()],
            )
            .unwrap(),
        )
    }

    fn pipeline() -> SpamPipeline {
        SpamPipeline::new(vectorizer(), svc(), nb(), PipelineConfig::default()).unwrap()
    }

    #[derive(Debug)]
    struct Panicking;

    impl BinaryClassifier for Panicking {
        fn predict(&self, _: &FeatureVector) -> Result<Label> {
            panic!("index out of bounds: the len is 6 but the index is 4096 in the support vector table");
        }

        fn predict_proba(&self, _: &FeatureVector) -> Result<[f64; 2]> {
            Ok([0.5, 0.5])
        }

        fn n_features(&self) -> usize {
            6
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    #[derive(Debug)]
    struct Truncating;

    impl Vectorizer for Truncating {
        fn transform(&self, _: &NormalizedText) -> Result<FeatureVector> {
            Ok(FeatureVector::zeros(3))
        }

        fn dimension(&self) -> usize {
            6
        }

        fn name(&self) -> &'static str {
            "truncating"
        }
    }

    #[test]
    fn test_validation() {
        let pipeline = pipeline();

        assert_eq!(
            pipeline.classify_message("", ModelSelector::Primary),
            Err(ClassificationError::EmptyInput)
        );
        assert_eq!(
            pipeline.classify_message(" \n\t ", ModelSelector::Primary),
            Err(ClassificationError::EmptyInput)
        );
        assert_eq!(
            pipeline.classify_message("  hi  ", ModelSelector::Secondary),
            Err(ClassificationError::TooShort {
                length: 2,
                min_length: 5
            })
        );
        assert!(pipeline.classify_message("  hello  ", ModelSelector::Primary).is_ok());
    }

    #[test]
    fn test_spam_message() {
        let result = pipeline()
            .classify_message("Congratulations! Click to claim your prize", ModelSelector::Primary)
            .unwrap();

        assert_eq!(result.label, Label::Spam);
        assert!(result.confidence > 70.0);
        assert_eq!(result.token_count, 4);
        assert_eq!(result.normalized_text.as_str(), "congratul click claim prize");
        assert_eq!(result.model_used, ModelSelector::Primary);
    }

    #[test]
    fn test_ham_message_with_secondary() {
        let result = pipeline()
            .classify_message("Meeting for lunch?", ModelSelector::Secondary)
            .unwrap();

        assert_eq!(result.label, Label::NotSpam);
        assert_eq!(result.model_used, ModelSelector::Secondary);
        let p = result.probabilities;
        assert!((p.not_spam() + p.spam() - 1.0).abs() < 1e-6);
        assert!((result.confidence - p.not_spam() * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unseen_vocabulary() {
        let pipeline = pipeline();
        for selector in ModelSelector::ALL {
            let result = pipeline
                .classify_message("Quantum zebras juggling", selector)
                .unwrap();
            assert!((0.0..=100.0).contains(&result.confidence));
        }
    }

    #[test]
    fn test_stopword_only_message() {
        let result = pipeline()
            .classify_message("and the of it", ModelSelector::Secondary)
            .unwrap();

        assert_eq!(result.token_count, 0);
        assert!(result.normalized_text.is_empty());
        // Falls back to the class prior.
        assert_eq!(result.label, Label::NotSpam);
        assert!((result.confidence - 60.0).abs() < 1e-9);
        assert_eq!(result.confidence_tier, ConfidenceTier::Low);
    }

    #[test]
    fn test_panic_becomes_classification_failure() {
        let pipeline =
            SpamPipeline::new(vectorizer(), svc(), Arc::new(Panicking), PipelineConfig::default())
                .unwrap();

        match pipeline.classify_message("claim your prize", ModelSelector::Secondary) {
            Err(ClassificationError::ClassificationFailure { diagnostic }) => {
                assert_eq!(diagnostic.chars().count(), 50);
                assert!(diagnostic.starts_with("index out of bounds"));
            }
            other => panic!("expected classification failure, got {other:?}"),
        }

        // The other model is unaffected.
        assert!(pipeline.classify_message("claim your prize", ModelSelector::Primary).is_ok());
    }

    #[test]
    fn test_wrong_vector_dimension_is_vectorization_failure() {
        let pipeline =
            SpamPipeline::new(Arc::new(Truncating), svc(), nb(), PipelineConfig::default()).unwrap();

        let result = pipeline.classify_message("claim your prize", ModelSelector::Primary);
        assert!(matches!(
            result,
            Err(ClassificationError::VectorizationFailure { .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch_at_construction() {
        let small: Arc<dyn Vectorizer> = Arc::new(
            TfIdfVectorizer::new([("prize".to_string(), 0)].into_iter().collect(), None).unwrap(),
        );

        let result = SpamPipeline::new(small, svc(), nb(), PipelineConfig::default());
        assert!(matches!(
            result,
            Err(SpamcheckError::DimensionMismatch { expected: 6, actual: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = PipelineConfig::default();
        config.thresholds.medium = 95.0;
        assert!(SpamPipeline::new(vectorizer(), svc(), nb(), config).is_err());
    }

    #[test]
    fn test_custom_min_length() {
        let config = PipelineConfig {
            min_message_length: 10,
            ..PipelineConfig::default()
        };
        let pipeline = SpamPipeline::new(vectorizer(), svc(), nb(), config).unwrap();

        assert_eq!(
            pipeline.classify_message("win prize", ModelSelector::Primary),
            Err(ClassificationError::TooShort {
                length: 9,
                min_length: 10
            })
        );
    }

    #[test]
    fn test_batch_preserves_order() {
        let pipeline = pipeline();
        let messages = vec!["claim your prize now", "hi", "", "lunch meeting today"];
        let results = pipeline.classify_batch(&messages, ModelSelector::Primary);

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().map(|r| r.label), Ok(Label::Spam));
        assert!(matches!(results[1], Err(ClassificationError::TooShort { .. })));
        assert_eq!(results[2], Err(ClassificationError::EmptyInput));
        assert_eq!(results[3].as_ref().map(|r| r.label), Ok(Label::NotSpam));
    }

    #[test]
    fn test_deterministic() {
        let pipeline = pipeline();
        let a = pipeline.classify_message("Click to claim", ModelSelector::Primary);
        let b = pipeline.classify_message("Click to claim", ModelSelector::Primary);
        assert_eq!(a, b);
    }
}
