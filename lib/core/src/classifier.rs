//! Tabular career classification pipeline
//!
//! Applies a feature scaler and a multinomial logistic-regression model
//! (both trained offline and loaded as artifacts) to a
//! [`StudentFeatures`] vector, returning the top-3 labels by probability.
//!
//! If the artifacts could not be loaded, classification degrades to an
//! explicit [`Prediction::Unavailable`] sentinel instead of failing the
//! request.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::{StudentFeatures, FEATURE_COUNT};

/// How many labels a prediction carries.
pub const TOP_K: usize = 3;

/// Per-feature standardization transform, paired 1:1 with the classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureScaler {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

impl FeatureScaler {
    /// Standardize a raw feature vector: `(x - mean) / scale`.
    fn transform(&self, values: &[f32]) -> Array1<f32> {
        Array1::from_iter(
            values
                .iter()
                .zip(self.mean.iter().zip(self.scale.iter()))
                .map(|(x, (m, s))| (x - m) / s),
        )
    }

    fn validate(&self) -> Result<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(Error::InvalidFeatureCount {
                expected: FEATURE_COUNT,
                actual: self.mean.len().min(self.scale.len()),
            });
        }
        if self.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(Error::ArtifactUnavailable(
                "scaler has zero or non-finite scale entries".to_string(),
            ));
        }
        Ok(())
    }
}

/// Serialized multinomial logistic-regression weights.
///
/// `coefficients` is one row per label; row i pairs with `labels[i]` and
/// `intercepts[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierWeights {
    pub labels: Vec<String>,
    pub coefficients: Vec<Vec<f32>>,
    pub intercepts: Vec<f32>,
}

/// One ranked label with its probability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub probability: f32,
}

/// Classification outcome.
///
/// `Unavailable` is the degrade-to-message sentinel for missing or corrupt
/// artifacts; it is a valid result, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Prediction {
    Ranked { top: Vec<LabelScore> },
    Unavailable,
}

/// Career classifier: scaler + logistic-regression weights + label list.
///
/// Immutable after construction and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct CareerClassifier {
    scaler: FeatureScaler,
    /// labels x features
    coefficients: Array2<f32>,
    intercepts: Array1<f32>,
    labels: Vec<String>,
}

impl CareerClassifier {
    /// Assemble the pipeline from its two artifacts.
    ///
    /// Validates the pairing invariants: scaler arity matches the feature
    /// schema, one coefficient row and one intercept per label.
    pub fn from_artifacts(scaler: FeatureScaler, weights: ClassifierWeights) -> Result<Self> {
        scaler.validate()?;

        let n_labels = weights.labels.len();
        if weights.coefficients.len() != n_labels || weights.intercepts.len() != n_labels {
            return Err(Error::LabelCountMismatch {
                labels: n_labels,
                outputs: weights.coefficients.len().min(weights.intercepts.len()),
            });
        }
        if n_labels == 0 {
            return Err(Error::ArtifactUnavailable(
                "classifier has no labels".to_string(),
            ));
        }
        for row in &weights.coefficients {
            if row.len() != FEATURE_COUNT {
                return Err(Error::InvalidFeatureCount {
                    expected: FEATURE_COUNT,
                    actual: row.len(),
                });
            }
        }

        let flat: Vec<f32> = weights.coefficients.into_iter().flatten().collect();
        let coefficients = Array2::from_shape_vec((n_labels, FEATURE_COUNT), flat)
            .map_err(|e| Error::ArtifactUnavailable(e.to_string()))?;

        Ok(Self {
            scaler,
            coefficients,
            intercepts: Array1::from_vec(weights.intercepts),
            labels: weights.labels,
        })
    }

    /// Ordered label list the probability vector is parallel to.
    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Full probability distribution over all labels (softmax).
    #[must_use]
    pub fn predict_proba(&self, features: &StudentFeatures) -> Vec<f32> {
        let scaled = self.scaler.transform(&features.to_vector());
        let logits = self.coefficients.dot(&scaled) + &self.intercepts;

        // Softmax with max-shift for numeric stability.
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = logits.iter().map(|z| (z - max).exp()).collect();
        let sum: f32 = exps.iter().sum();
        exps.into_iter().map(|e| e / sum).collect()
    }

    /// Top-3 labels by probability.
    ///
    /// Stable descending sort on probability; equal probabilities keep
    /// label-index order.
    #[must_use]
    pub fn classify(&self, features: &StudentFeatures) -> Vec<LabelScore> {
        let probs = self.predict_proba(features);

        let mut ranked: Vec<usize> = (0..probs.len()).collect();
        ranked.sort_by(|a, b| {
            probs[*b]
                .partial_cmp(&probs[*a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        ranked
            .into_iter()
            .take(TOP_K)
            .map(|i| LabelScore {
                label: self.labels[i].clone(),
                probability: probs[i],
            })
            .collect()
    }
}

/// Handle the web layer holds: either a loaded pipeline or the
/// unavailable sentinel.
#[derive(Debug, Clone)]
pub enum ClassifierHandle {
    Loaded(CareerClassifier),
    Unavailable,
}

impl ClassifierHandle {
    /// Classify, degrading to [`Prediction::Unavailable`] when the
    /// artifacts never loaded.
    #[must_use]
    pub fn classify(&self, features: &StudentFeatures) -> Prediction {
        match self {
            Self::Loaded(classifier) => Prediction::Ranked {
                top: classifier.classify(features),
            },
            Self::Unavailable => Prediction::Unavailable,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}
