use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_ENV: &str = "GLUCOTRACK_CONFIG";
pub const MODEL_PATH_ENV: &str = "GLUCOTRACK_MODEL_PATH";
pub const MODEL_BACKEND_ENV: &str = "GLUCOTRACK_MODEL_BACKEND";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: f32,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_max_age: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub backend: ModelBackend,
    pub path: PathBuf,
    /// Overrides the decision threshold stored in the artifact.
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    Logistic,
    Torchscript,
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

fn default_version() -> f32 {
    1.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            cors_max_age: 3600,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Logistic,
            path: PathBuf::from("models/diabetes_model.json"),
            threshold: None,
        }
    }
}

impl FromStr for ModelBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logistic" => Ok(ModelBackend::Logistic),
            "torchscript" => Ok(ModelBackend::Torchscript),
            other => Err(ConfigError::InvalidValue {
                key: "model.backend".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelBackend::Logistic => write!(f, "logistic"),
            ModelBackend::Torchscript => write!(f, "torchscript"),
        }
    }
}

impl AppConfig {
    /// Reads a YAML config. A relative `model.path` is resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&config_str)?;
        if config.model.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.model.path = dir.join(&config.model.path);
            }
        }
        Ok(config)
    }

    pub fn from_yaml(config_str: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves the config file from `GLUCOTRACK_CONFIG`, falling back to
    /// `config/glucotrack.yaml` and then to built-in defaults, and applies
    /// environment overrides on top.
    pub fn load() -> Result<(Self, ConfigSource), ConfigError> {
        let (mut config, source) = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let path = PathBuf::from(path);
                (Self::from_file(&path)?, ConfigSource::File(path))
            }
            Err(_) => {
                let path = default_config_path();
                if path.exists() {
                    (Self::from_file(&path)?, ConfigSource::File(path))
                } else {
                    (Self::default(), ConfigSource::Defaults)
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok((config, source))
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(path) = lookup(MODEL_PATH_ENV) {
            self.model.path = PathBuf::from(path);
        }
        if let Some(backend) = lookup(MODEL_BACKEND_ENV) {
            self.model.backend = backend.parse()?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "server.host".to_string(),
                value: self.server.host.clone(),
            });
        }
        if let Some(threshold) = self.model.threshold {
            if !(threshold > 0.0 && threshold < 1.0) {
                return Err(ConfigError::InvalidValue {
                    key: "model.threshold".to_string(),
                    value: threshold.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn default_config_path() -> PathBuf {
    match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(manifest_dir) => PathBuf::from(format!("{}/../config/glucotrack.yaml", manifest_dir)),
        Err(_) => PathBuf::from("config/glucotrack.yaml"),
    }
}
