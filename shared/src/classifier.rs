use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::features::FeatureVector;

/// Probability at or above which the positive class is predicted.
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLabel {
    HighRisk,
    LowRisk,
}

impl RiskLabel {
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            RiskLabel::HighRisk
        } else {
            RiskLabel::LowRisk
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: RiskLabel,
    /// Probability of the positive (`high_risk`) class.
    pub probability: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Model artifact '{artifact}' unavailable: {reason}")]
    ModelUnavailable { artifact: String, reason: String },
    #[error("Inference failed: {0}")]
    Inference(String),
}

/// A binary risk model. Implementations are shared across concurrent requests,
/// so inference must be stateless or internally synchronized.
pub trait RiskClassifier: Send + Sync {
    fn name(&self) -> &str;

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ClassifierError>;

    fn decision_threshold(&self) -> f64 {
        DEFAULT_DECISION_THRESHOLD
    }

    /// Maps a validated positive-class probability to a label.
    fn label_for(&self, probability: f64) -> RiskLabel {
        RiskLabel::from_probability(probability, self.decision_threshold())
    }

    /// Runs inference once and rejects a non-finite or out-of-range probability.
    fn checked_probability(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        let probability = self.predict_probability(features)?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ClassifierError::Inference(format!(
                "{} returned probability {} outside [0, 1]",
                self.name(),
                probability
            )));
        }
        Ok(probability)
    }

    fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, ClassifierError> {
        let probability = self.checked_probability(features)?;
        Ok(self.label_for(probability))
    }

    fn classify(&self, features: &FeatureVector) -> Result<ClassificationResult, ClassifierError> {
        let probability = self.checked_probability(features)?;
        Ok(ClassificationResult {
            label: self.label_for(probability),
            probability,
        })
    }
}

/// Deterministic classifier returning the same result for every input.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    label: Option<RiskLabel>,
    probability: f64,
}

impl FixedClassifier {
    /// Label follows [`DEFAULT_DECISION_THRESHOLD`].
    pub fn new(probability: f64) -> Self {
        Self {
            label: None,
            probability,
        }
    }

    pub fn with_label(label: RiskLabel, probability: f64) -> Self {
        Self {
            label: Some(label),
            probability,
        }
    }
}

impl RiskClassifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict_probability(&self, _features: &FeatureVector) -> Result<f64, ClassifierError> {
        Ok(self.probability)
    }

    fn label_for(&self, probability: f64) -> RiskLabel {
        self.label
            .unwrap_or_else(|| RiskLabel::from_probability(probability, self.decision_threshold()))
    }
}
