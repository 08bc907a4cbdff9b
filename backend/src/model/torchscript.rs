use shared::{ClassifierError, DEFAULT_DECISION_THRESHOLD, FeatureVector, RiskClassifier};
use std::path::Path;
use std::sync::Mutex;
use tch::{CModule, Device, Kind, Tensor};

/// TorchScript export of the risk model. `CModule` is not `Sync`, so forward
/// passes are serialized behind a mutex.
pub struct TorchScriptClassifier {
    name: String,
    module: Mutex<CModule>,
    device: Device,
    threshold: f64,
}

impl TorchScriptClassifier {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let device = Device::cuda_if_available();
        let module = CModule::load_on_device(path, device).map_err(|e| {
            ClassifierError::ModelUnavailable {
                artifact: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "torchscript".to_string());

        Ok(Self {
            name,
            module: Mutex::new(module),
            device,
            threshold: DEFAULT_DECISION_THRESHOLD,
        })
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

fn inference_error(e: tch::TchError) -> ClassifierError {
    ClassifierError::Inference(e.to_string())
}

impl RiskClassifier for TorchScriptClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn decision_threshold(&self) -> f64 {
        self.threshold
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        let values: Vec<f32> = features.values().iter().map(|v| *v as f32).collect();
        let input = Tensor::from_slice(&values)
            .f_view([1, values.len() as i64])
            .map_err(inference_error)?
            .to_device(self.device);

        let output = {
            let module = self
                .module
                .lock()
                .map_err(|_| ClassifierError::Inference("model mutex poisoned".into()))?;
            module.forward_ts(&[input]).map_err(inference_error)?
        };
        let output = output
            .to_kind(Kind::Float)
            .f_view([-1])
            .map_err(inference_error)?;

        // Two logits: softmax and take the positive class. One logit: sigmoid.
        match output.size()[0] {
            2 => output
                .f_softmax(-1, Kind::Float)
                .and_then(|p| p.f_double_value(&[1]))
                .map_err(inference_error),
            1 => output
                .f_sigmoid()
                .and_then(|p| p.f_double_value(&[0]))
                .map_err(inference_error),
            n => Err(ClassifierError::Inference(format!(
                "expected 1 or 2 outputs from model, got {}",
                n
            ))),
        }
    }
}
