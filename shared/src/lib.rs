pub mod assessment;
pub mod classifier;
pub mod features;
pub mod metrics;

pub use assessment::{Assessment, AssessmentError, assess, assess_measurements};
pub use classifier::{
    ClassificationResult, ClassifierError, DEFAULT_DECISION_THRESHOLD, FixedClassifier,
    RiskClassifier, RiskLabel,
};
pub use features::{FEATURE_COUNT, FeatureName, FeatureVector, Measurements, ValidationError};
pub use metrics::{
    BmiCategory, DerivedMetrics, HEALTHY_REFERENCE, LifestyleRating, RadarPoint, ReferenceCheck,
    RiskBand,
};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<FeatureName>,
}
