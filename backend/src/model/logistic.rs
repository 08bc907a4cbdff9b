use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use shared::{
    ClassifierError, DEFAULT_DECISION_THRESHOLD, FEATURE_COUNT, FeatureName, FeatureVector,
    RiskClassifier,
};
use std::fs;
use std::path::Path;

/// Standard-scaler parameters applied before the linear model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// On-disk form of an exported logistic-regression pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Logistic regression read from a JSON artifact. Immutable after load,
/// so one instance can serve concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    name: String,
    coefficients: Array1<f64>,
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
    intercept: f64,
    threshold: f64,
}

impl LogisticClassifier {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let unavailable = |reason: String| ClassifierError::ModelUnavailable {
            artifact: path.display().to_string(),
            reason,
        };

        let raw = fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
        let artifact: LogisticArtifact =
            serde_json::from_str(&raw).map_err(|e| unavailable(e.to_string()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "logistic".to_string());

        Self::from_artifact(name, artifact).map_err(|e| match e {
            ClassifierError::ModelUnavailable { reason, .. } => unavailable(reason),
            other => other,
        })
    }

    pub fn from_artifact(name: String, artifact: LogisticArtifact) -> Result<Self, ClassifierError> {
        let unavailable = |reason: String| ClassifierError::ModelUnavailable {
            artifact: name.clone(),
            reason,
        };

        if let Some(model_type) = &artifact.model_type {
            if model_type != "logistic_regression" {
                return Err(unavailable(format!(
                    "unsupported model_type '{}'",
                    model_type
                )));
            }
        }

        if let Some(names) = &artifact.feature_names {
            let expected: Vec<&str> = FeatureName::ordered().map(FeatureName::column_name).collect();
            if names.iter().map(String::as_str).ne(expected.iter().copied()) {
                return Err(unavailable(format!(
                    "feature_names {:?} do not match expected order {:?}",
                    names, expected
                )));
            }
        }

        if let Some(scaler) = &artifact.scaler {
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(unavailable("scaler contains a zero or non-finite scale".into()));
            }
        }

        let threshold = artifact.threshold.unwrap_or(DEFAULT_DECISION_THRESHOLD);
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(unavailable(format!("threshold {} outside (0, 1)", threshold)));
        }

        if artifact.coefficients.len() != FEATURE_COUNT {
            log::warn!(
                "Model '{}' has {} coefficients but feature vectors have {}; predictions will fail",
                name,
                artifact.coefficients.len(),
                FEATURE_COUNT
            );
        }

        let (mean, scale) = match artifact.scaler {
            Some(scaler) => (
                Some(Array1::from(scaler.mean)),
                Some(Array1::from(scaler.scale)),
            ),
            None => (None, None),
        };

        Ok(Self {
            name,
            coefficients: Array1::from(artifact.coefficients),
            mean,
            scale,
            intercept: artifact.intercept,
            threshold,
        })
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    fn standardize(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ClassifierError> {
        match (&self.mean, &self.scale) {
            (Some(mean), Some(scale)) => {
                if mean.len() != x.len() || scale.len() != x.len() {
                    return Err(ClassifierError::Inference(format!(
                        "scaler expects {} features, got {}",
                        mean.len().max(scale.len()),
                        x.len()
                    )));
                }
                Ok((&x - mean) / scale)
            }
            _ => Ok(x.to_owned()),
        }
    }
}

impl RiskClassifier for LogisticClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn decision_threshold(&self) -> f64 {
        self.threshold
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        let values = features.values();
        let x = ArrayView1::from(&values[..]);
        if self.coefficients.len() != x.len() {
            return Err(ClassifierError::Inference(format!(
                "model expects {} features, got {}",
                self.coefficients.len(),
                x.len()
            )));
        }

        let z = self.standardize(x)?;
        let eta = (self.intercept + z.dot(&self.coefficients)).clamp(-700.0, 700.0);
        let probability = 1.0 / (1.0 + f64::exp(-eta));
        if !probability.is_finite() {
            return Err(ClassifierError::Inference(format!(
                "non-finite probability from linear predictor {}",
                eta
            )));
        }
        Ok(probability)
    }
}
