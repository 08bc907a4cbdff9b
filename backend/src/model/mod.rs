pub mod logistic;
#[cfg(feature = "torchscript")]
pub mod torchscript;

use shared::{ClassifierError, RiskClassifier};
use std::sync::Arc;

use crate::config::{ModelBackend, ModelConfig};

pub use logistic::LogisticClassifier;
#[cfg(feature = "torchscript")]
pub use torchscript::TorchScriptClassifier;

/// Loads the configured classifier. Called once at startup; the returned
/// adapter is shared read-only for the life of the process.
pub fn load_classifier(config: &ModelConfig) -> Result<Arc<dyn RiskClassifier>, ClassifierError> {
    log::info!(
        "Loading {} model from {}",
        config.backend,
        config.path.display()
    );

    let classifier: Arc<dyn RiskClassifier> = match config.backend {
        ModelBackend::Logistic => {
            let mut model = LogisticClassifier::load(&config.path)?;
            if let Some(threshold) = config.threshold {
                model = model.with_threshold(threshold);
            }
            Arc::new(model)
        }
        #[cfg(feature = "torchscript")]
        ModelBackend::Torchscript => {
            let mut model = TorchScriptClassifier::load(&config.path)?;
            if let Some(threshold) = config.threshold {
                model = model.with_threshold(threshold);
            }
            Arc::new(model)
        }
        #[cfg(not(feature = "torchscript"))]
        ModelBackend::Torchscript => {
            return Err(ClassifierError::ModelUnavailable {
                artifact: config.path.display().to_string(),
                reason: "built without the `torchscript` feature".to_string(),
            });
        }
    };

    log::info!(
        "Model '{}' ready (decision threshold {})",
        classifier.name(),
        classifier.decision_threshold()
    );
    Ok(classifier)
}
