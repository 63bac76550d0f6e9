//! TF-IDF vectorizer for text feature extraction.
//!
//! Applies a vocabulary and inverse document frequencies fitted offline. The
//! transform mirrors scikit-learn's `TfidfVectorizer.transform`:
//!
//! 1. optional lowercasing
//! 2. term extraction with a token pattern (first capture group if present)
//! 3. stop word removal
//! 4. word n-grams over `ngram_range`
//! 5. term counts, optionally binary or sublinear (`1 + ln(tf)`)
//! 6. multiplication by `idf`
//! 7. row normalization (`l2`, `l1` or none)

use std::collections::HashSet;

use ahash::AHashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::NormalizedText;
use crate::error::{Result, SpamcheckError};
use crate::ml::features::FeatureVector;
use crate::ml::vectorizer::Vectorizer;

/// The default scikit-learn token pattern: words of two or more characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Python's `\w`: letters, numbers and the underscore. The `regex` crate's
/// `\w` also matches combining marks.
const WORD_CLASS: &str = r"[\p{L}\p{N}_]";
const NON_WORD_CLASS: &str = r"[^\p{L}\p{N}_]";

/// What the default pattern matches under Python's word boundaries: every
/// maximal run of two or more word characters.
const DEFAULT_TOKEN_REGEX: &str = r"[\p{L}\p{N}_]{2,}";

/// Row normalization applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// TF-IDF vectorizer for text feature extraction.
#[derive(Clone)]
pub struct TfIdfVectorizer {
    /// Vocabulary: term -> column index.
    vocabulary: AHashMap<String, usize>,
    /// Inverse document frequency per column; `None` disables idf weighting.
    idf: Option<Vec<f64>>,
    token_pattern: Regex,
    lowercase: bool,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    binary: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("use_idf", &self.idf.is_some())
            .field("token_pattern", &self.token_pattern.as_str())
            .field("ngram_range", &self.ngram_range)
            .field("norm", &self.norm)
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a vectorizer with scikit-learn's default options.
    ///
    /// `vocabulary` must map terms onto exactly `0..n` and `idf` must hold
    /// `n` finite, positive weights.
    ///
    /// # Examples
    ///
    /// ```
    /// use spamcheck::ml::vectorizer::TfIdfVectorizer;
    ///
    /// let vectorizer = TfIdfVectorizer::new(
    ///     [("free".to_string(), 0), ("prize".to_string(), 1)].into_iter().collect(),
    ///     Some(vec![1.5, 2.0]),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(vectorizer.vocabulary_size(), 2);
    /// ```
    pub fn new(vocabulary: AHashMap<String, usize>, idf: Option<Vec<f64>>) -> Result<Self> {
        let token_pattern = compile_token_pattern(DEFAULT_TOKEN_PATTERN)?;
        let vectorizer = TfIdfVectorizer {
            vocabulary,
            idf,
            token_pattern,
            lowercase: true,
            ngram_range: (1, 1),
            stop_words: HashSet::new(),
            binary: false,
            sublinear_tf: false,
            norm: Some(Norm::L2),
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Replace the token pattern.
    pub fn with_token_pattern(mut self, pattern: &str) -> Result<Self> {
        self.token_pattern = compile_token_pattern(pattern)?;
        Ok(self)
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Set the inclusive n-gram range. Requires `1 <= min <= max`.
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Result<Self> {
        if min_n == 0 || min_n > max_n {
            return Err(SpamcheckError::artifact(format!(
                "Invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        self.ngram_range = (min_n, max_n);
        Ok(self)
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    pub fn with_norm(mut self, norm: Option<Norm>) -> Self {
        self.norm = norm;
        self
    }

    fn validate(&self) -> Result<()> {
        let n = self.vocabulary.len();
        let mut seen = vec![false; n];
        for (term, &index) in &self.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(SpamcheckError::artifact(format!(
                        "Vocabulary index {index} is assigned to more than one term"
                    )));
                }
                None => {
                    return Err(SpamcheckError::artifact(format!(
                        "Vocabulary index {index} of term {term:?} is out of range for {n} terms"
                    )));
                }
            }
        }

        if let Some(idf) = &self.idf {
            if idf.len() != n {
                return Err(SpamcheckError::dimension_mismatch("idf", n, idf.len()));
            }
            if let Some(position) = idf.iter().position(|w| !w.is_finite() || *w <= 0.0) {
                return Err(SpamcheckError::artifact(format!(
                    "idf weight at {position} is not a finite positive number"
                )));
            }
        }

        Ok(())
    }

    /// Number of terms in the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column index of `term`, if it is in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self) -> Option<&[f64]> {
        self.idf.as_deref()
    }

    pub fn norm(&self) -> Option<Norm> {
        self.norm
    }

    /// Extract the terms (including n-grams) the vocabulary is looked up with.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let group = if self.token_pattern.captures_len() > 1 { 1 } else { 0 };
        let tokens: Vec<String> = self
            .token_pattern
            .captures_iter(&text)
            .filter_map(|caps| caps.get(group).map(|m| m.as_str().to_string()))
            .filter(|token| !self.stop_words.contains(token))
            .collect();

        self.word_ngrams(tokens)
    }

    fn word_ngrams(&self, tokens: Vec<String>) -> Vec<String> {
        let (mut min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return tokens;
        }

        let n_original = tokens.len();
        let mut terms = if min_n == 1 {
            min_n += 1;
            tokens.clone()
        } else {
            Vec::new()
        };

        for n in min_n..=max_n.min(n_original) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }

        terms
    }

    fn weight(&self, counts: AHashMap<usize, f64>) -> Vec<f64> {
        let mut values = vec![0.0; self.vocabulary.len()];

        for (index, count) in counts {
            let mut tf = if self.binary { 1.0 } else { count };
            if self.sublinear_tf {
                tf = tf.ln() + 1.0;
            }
            if let Some(idf) = &self.idf {
                tf *= idf[index];
            }
            values[index] = tf;
        }

        let norm = match self.norm {
            Some(Norm::L2) => values.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => values.iter().map(|v| v.abs()).sum::<f64>(),
            None => 0.0,
        };
        if norm > 0.0 {
            for v in &mut values {
                *v /= norm;
            }
        }

        values
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn transform(&self, text: &NormalizedText) -> Result<FeatureVector> {
        let mut counts: AHashMap<usize, f64> = AHashMap::new();
        for term in self.analyze(text.as_str()) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let values = self.weight(counts);
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SpamcheckError::vectorization(
                "TF-IDF weights are not finite",
            ));
        }

        Ok(FeatureVector::new(values))
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}

/// Rewrite `\w` and `\W` to their Python meaning. `\b` keeps the `regex`
/// crate's definition, so custom patterns may still split differently next
/// to combining marks.
fn translate_word_classes(pattern: &str) -> String {
    let mut translated = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            translated.push(c);
            continue;
        }
        match chars.next() {
            Some('w') => translated.push_str(WORD_CLASS),
            Some('W') => translated.push_str(NON_WORD_CLASS),
            Some(escaped) => {
                translated.push('\\');
                translated.push(escaped);
            }
            None => translated.push('\\'),
        }
    }

    translated
}

fn compile_token_pattern(pattern: &str) -> Result<Regex> {
    let translated = if pattern == DEFAULT_TOKEN_PATTERN {
        DEFAULT_TOKEN_REGEX.to_string()
    } else {
        translate_word_classes(pattern)
    };

    let regex = Regex::new(&translated)
        .map_err(|e| SpamcheckError::artifact(format!("Invalid token pattern: {e}")))?;

    if regex.captures_len() > 2 {
        return Err(SpamcheckError::artifact(format!(
            "Token pattern {pattern:?} has more than one capturing group"
        )));
    }

    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(terms: &[&str]) -> AHashMap<String, usize> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect()
    }

    fn text(s: &str) -> NormalizedText {
        NormalizedText::from_terms(s.split_whitespace())
    }

    #[test]
    fn test_tfidf_l2() {
        let vectorizer =
            TfIdfVectorizer::new(vocabulary(&["claim", "free", "prize"]), Some(vec![2.0, 1.0, 3.0]))
                .unwrap();

        let vector = vectorizer.transform(&text("free prize prize unknown")).unwrap();

        // raw weights: claim 0, free 1 * 1, prize 2 * 3
        let norm = (1.0f64 + 36.0).sqrt();
        assert_eq!(vector.dimension(), 3);
        assert_eq!(vector.values()[0], 0.0);
        assert!((vector.values()[1] - 1.0 / norm).abs() < 1e-12);
        assert!((vector.values()[2] - 6.0 / norm).abs() < 1e-12);
        assert!((vector.squared_norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_terms_give_zero_vector() {
        let vectorizer =
            TfIdfVectorizer::new(vocabulary(&["claim", "free"]), Some(vec![1.0, 1.0])).unwrap();

        let vector = vectorizer.transform(&text("hello world")).unwrap();
        assert!(vector.is_zero());

        let empty = vectorizer.transform(&NormalizedText::default()).unwrap();
        assert!(empty.is_zero());
        assert_eq!(empty.dimension(), 2);
    }

    #[test]
    fn test_single_character_terms_are_ignored_by_default_pattern() {
        let vectorizer =
            TfIdfVectorizer::new(vocabulary(&["u", "ur"]), Some(vec![1.0, 1.0])).unwrap();

        let vector = vectorizer.transform(&text("u ur")).unwrap();
        assert_eq!(vector.values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_ngrams() {
        let vectorizer = TfIdfVectorizer::new(
            vocabulary(&["free", "free entri", "entri", "win"]),
            Some(vec![1.0; 4]),
        )
        .unwrap()
        .with_ngram_range(1, 2)
        .unwrap();

        assert_eq!(
            vectorizer.analyze("free entri win"),
            vec!["free", "entri", "win", "free entri", "entri win"]
        );

        let bigrams_only = vectorizer.clone().with_ngram_range(2, 2).unwrap();
        assert_eq!(bigrams_only.analyze("free entri win"), vec!["free entri", "entri win"]);
        assert!(bigrams_only.analyze("free").is_empty());
    }

    #[test]
    fn test_sublinear_binary_l1_and_no_idf() {
        let base = TfIdfVectorizer::new(vocabulary(&["cash", "win"]), None).unwrap();

        let raw = base.clone().with_norm(None);
        assert_eq!(raw.transform(&text("cash cash cash win")).unwrap().values(), &[3.0, 1.0]);

        let binary = raw.clone().with_binary(true);
        assert_eq!(binary.transform(&text("cash cash cash win")).unwrap().values(), &[1.0, 1.0]);

        let sublinear = raw.with_sublinear_tf(true);
        let values = sublinear.transform(&text("cash cash cash win")).unwrap().into_inner();
        assert!((values[0] - (1.0 + 3.0f64.ln())).abs() < 1e-12);
        assert_eq!(values[1], 1.0);

        let l1 = base.with_norm(Some(Norm::L1));
        assert_eq!(l1.transform(&text("cash cash cash win")).unwrap().values(), &[0.75, 0.25]);
    }

    #[test]
    fn test_stop_words_and_capture_group() {
        let vectorizer = TfIdfVectorizer::new(vocabulary(&["win", "txt"]), None)
            .unwrap()
            .with_norm(None)
            .with_stop_words(["txt"])
            .with_token_pattern(r"#(\w+)")
            .unwrap();

        assert_eq!(vectorizer.analyze("#win #txt win"), vec!["win"]);
        assert_eq!(vectorizer.transform(&text("#win")).unwrap().values(), &[1.0, 0.0]);
    }

    #[test]
    fn test_token_pattern_uses_python_word_characters() {
        let vectorizer = TfIdfVectorizer::new(vocabulary(&["friend"]), None).unwrap();

        assert_eq!(vectorizer.analyze("नमो friend"), vec!["नम", "friend"]);
        assert_eq!(vectorizer.analyze("สวัสดี a win_now"), vec!["สว", "สด", "win_now"]);
        assert_eq!(vectorizer.analyze("1,000 ½½"), vec!["000", "½½"]);

        let hashtags = vectorizer.with_token_pattern(r"#(\w+)").unwrap();
        assert_eq!(hashtags.analyze("#नमो #[x] \\w"), vec!["नम"]);
    }

    #[test]
    fn test_translate_word_classes() {
        assert_eq!(translate_word_classes(r"\w+"), r"[\p{L}\p{N}_]+");
        assert_eq!(translate_word_classes(r"[\W\d]"), r"[[^\p{L}\p{N}_]\d]");
        assert_eq!(translate_word_classes(r"\\w\."), r"\\w\.");
    }

    #[test]
    fn test_invalid_artifacts_are_rejected() {
        let gap = [("a".to_string(), 0), ("b".to_string(), 2)].into_iter().collect();
        assert!(TfIdfVectorizer::new(gap, None).is_err());

        let duplicate = [("a".to_string(), 0), ("b".to_string(), 0)].into_iter().collect();
        assert!(TfIdfVectorizer::new(duplicate, None).is_err());

        let short_idf = TfIdfVectorizer::new(vocabulary(&["a", "b"]), Some(vec![1.0]));
        assert!(matches!(
            short_idf,
            Err(SpamcheckError::DimensionMismatch { expected: 2, actual: 1, .. })
        ));

        assert!(TfIdfVectorizer::new(vocabulary(&["a"]), Some(vec![f64::NAN])).is_err());
        assert!(TfIdfVectorizer::new(vocabulary(&["a"]), Some(vec![0.0])).is_err());

        let base = TfIdfVectorizer::new(vocabulary(&["a"]), None).unwrap();
        assert!(base.clone().with_ngram_range(0, 1).is_err());
        assert!(base.clone().with_ngram_range(3, 2).is_err());
        assert!(base.clone().with_token_pattern("(").is_err());
        assert!(base.with_token_pattern(r"(\w)(\w)").is_err());
    }
}
