//! Dense feature vectors.

use serde::{Deserialize, Serialize};

/// A fixed-length dense vector of feature weights.
///
/// The dimension is fixed by the vectorizer artifact; every classifier that
/// consumes the vector must have been fitted on the same dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        FeatureVector { values }
    }

    /// An all-zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        FeatureVector {
            values: vec![0.0; dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Iterate over `(index, value)` pairs of the non-zero entries.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| *v != 0.0)
    }

    /// Dot product with a dense weight row of the same dimension.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.values
            .iter()
            .zip(weights)
            .map(|(x, w)| if *x == 0.0 { 0.0 } else { x * w })
            .sum()
    }

    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        FeatureVector::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let vector = FeatureVector::zeros(4);
        assert_eq!(vector.dimension(), 4);
        assert!(vector.is_zero());
        assert_eq!(vector.nnz(), 0);
        assert_eq!(vector.squared_norm(), 0.0);
    }

    #[test]
    fn test_sparse_access() {
        let vector = FeatureVector::new(vec![0.0, 0.6, 0.0, 0.8]);
        assert_eq!(vector.nnz(), 2);
        assert_eq!(vector.iter_nonzero().collect::<Vec<_>>(), vec![(1, 0.6), (3, 0.8)]);
        assert!((vector.squared_norm() - 1.0).abs() < 1e-12);
        assert_eq!(vector.get(3), Some(0.8));
        assert_eq!(vector.get(4), None);
    }

    #[test]
    fn test_dot_ignores_weights_of_zero_features() {
        let vector = FeatureVector::new(vec![0.0, 2.0]);
        // -inf weight on an absent feature must not poison the sum
        assert_eq!(vector.dot(&[f64::NEG_INFINITY, 1.5]), 3.0);
    }
}
