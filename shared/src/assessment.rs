use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierError, RiskClassifier, RiskLabel};
use crate::features::{FeatureName, FeatureVector, Measurements, ValidationError};
use crate::metrics::{
    BmiCategory, DerivedMetrics, LifestyleRating, RadarPoint, ReferenceCheck, RiskBand,
};

/// Result of one risk assessment: the classifier's verdict plus the derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub label: RiskLabel,
    pub probability: f64,
    pub probability_percent: f64,
    pub risk_band: RiskBand,
    pub bmi_category: BmiCategory,
    pub lifestyle_score: i32,
    pub lifestyle_rating: LifestyleRating,
    pub radar_comparison: Vec<RadarPoint>,
    pub reference_checks: Vec<ReferenceCheck>,
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl AssessmentError {
    pub fn kind(&self) -> &'static str {
        match self {
            AssessmentError::Validation(_) => "validation_error",
            AssessmentError::Classifier(ClassifierError::ModelUnavailable { .. }) => {
                "model_unavailable"
            }
            AssessmentError::Classifier(ClassifierError::Inference(_)) => "inference_error",
        }
    }

    pub fn field(&self) -> Option<FeatureName> {
        match self {
            AssessmentError::Validation(e) => Some(e.field()),
            AssessmentError::Classifier(_) => None,
        }
    }
}

pub fn assess(
    classifier: &dyn RiskClassifier,
    features: &FeatureVector,
) -> Result<Assessment, AssessmentError> {
    let classification = classifier.classify(features)?;
    let metrics = DerivedMetrics::compute(features);
    let probability_percent = classification.probability * 100.0;

    Ok(Assessment {
        label: classification.label,
        probability: classification.probability,
        probability_percent,
        risk_band: RiskBand::from_probability(classification.probability),
        bmi_category: metrics.bmi_category,
        lifestyle_score: metrics.lifestyle_score,
        lifestyle_rating: metrics.lifestyle_rating,
        radar_comparison: metrics.radar_comparison,
        reference_checks: metrics.reference_checks,
    })
}

/// Validates raw measurements, then runs [`assess`].
pub fn assess_measurements(
    classifier: &dyn RiskClassifier,
    input: Measurements,
) -> Result<Assessment, AssessmentError> {
    let features = FeatureVector::assemble(input)?;
    assess(classifier, &features)
}
