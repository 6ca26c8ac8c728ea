//! Configuration for the diagnosis service.
//!
//! [`ServiceConfig`] is plain serde data: it can be built in code, read from a
//! JSON file, and adjusted through `LEAFSCAN_*` environment variables before
//! being handed to the service constructor, which validates it.

pub mod errors;
pub mod onnx;

pub use errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
pub use onnx::{OrtGraphOptimizationLevel, OrtSessionConfig};

use crate::core::errors::LeafError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the primary model path.
pub const ENV_MODEL_PATH: &str = "LEAFSCAN_MODEL_PATH";
/// Environment variable overriding the fallback model path.
pub const ENV_FALLBACK_MODEL_PATH: &str = "LEAFSCAN_FALLBACK_MODEL_PATH";
/// Environment variable overriding the confidence floor.
pub const ENV_CONFIDENCE_FLOOR: &str = "LEAFSCAN_CONFIDENCE_FLOOR";

/// Default noise floor below which ranked entries are dropped.
pub const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.01;
/// Default classifier input size (height, width).
pub const DEFAULT_INPUT_SHAPE: (u32, u32) = (224, 224);

/// Where to look for the classifier artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPaths {
    /// Path tried first.
    pub primary: PathBuf,
    /// Path tried when the primary is missing or unparseable.
    #[serde(default)]
    pub fallback: Option<PathBuf>,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            primary: PathBuf::from("models/tomato_disease.onnx"),
            fallback: Some(PathBuf::from("../models/best_mobilenet_finetuned.onnx")),
        }
    }
}

impl ModelPaths {
    /// Candidate paths in the order they are tried.
    pub fn candidates(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.primary.as_path()).chain(self.fallback.as_deref())
    }
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Model artifact locations.
    pub model: ModelPaths,
    /// Classifier input shape (height, width).
    pub input_shape: (u32, u32),
    /// Entries scoring at or below this value are left out of the ranking.
    pub confidence_floor: f32,
    /// Model input tensor name; discovered from the model when `None`.
    pub input_name: Option<String>,
    /// Number of ONNX Runtime sessions kept for concurrent requests.
    pub session_pool_size: usize,
    /// ONNX Runtime session settings.
    pub ort_session: Option<OrtSessionConfig>,
    /// Load the model when the service is built rather than on first use.
    pub eager_load: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: ModelPaths::default(),
            input_shape: DEFAULT_INPUT_SHAPE,
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            input_name: None,
            session_pool_size: 1,
            ort_session: None,
            eager_load: true,
        }
    }
}

impl ServiceConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that loads the model from `path` only.
    pub fn with_model_path(path: impl Into<PathBuf>) -> Self {
        Self {
            model: ModelPaths {
                primary: path.into(),
                fallback: None,
            },
            ..Self::default()
        }
    }

    /// Sets the fallback model path.
    pub fn fallback_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model.fallback = Some(path.into());
        self
    }

    /// Sets the confidence floor.
    pub fn confidence_floor(mut self, floor: f32) -> Self {
        self.confidence_floor = floor;
        self
    }

    /// Sets whether the model is loaded eagerly.
    pub fn eager_load(mut self, eager: bool) -> Self {
        self.eager_load = eager;
        self
    }

    /// Sets the ONNX Runtime session pool size.
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.session_pool_size = size;
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn ort_session(mut self, config: OrtSessionConfig) -> Self {
        self.ort_session = Some(config);
        self
    }

    /// Reads a configuration from a JSON file; missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LeafError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: ServiceConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Applies `LEAFSCAN_*` overrides from the process environment.
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_MODEL_PATH) {
            self.model.primary = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_FALLBACK_MODEL_PATH) {
            self.model.fallback = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(ENV_CONFIDENCE_FLOOR) {
            self.confidence_floor =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnvOverride {
                        variable: ENV_CONFIDENCE_FLOOR.to_string(),
                        value: raw.clone(),
                    })?;
        }
        Ok(self)
    }
}

impl ConfigValidator for ServiceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let (height, width) = self.input_shape;
        self.validate_image_dimensions(width, height)?;
        self.validate_confidence_floor(self.confidence_floor)?;
        self.validate_positive_usize(self.session_pool_size, "session_pool_size")?;

        if self.model.primary.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "Primary model path must not be empty".to_string(),
            });
        }

        if let Some(ort) = &self.ort_session {
            if let Some(threads) = ort.intra_threads {
                self.validate_thread_count(threads)?;
            }
            if let Some(threads) = ort.inter_threads {
                self.validate_thread_count(threads)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input_shape, (224, 224));
        assert_eq!(config.confidence_floor, 0.01);
        assert!(config.eager_load);
    }

    #[test]
    fn test_candidates_order() {
        let config = ServiceConfig::with_model_path("a.onnx").fallback_model_path("b.onnx");
        let candidates: Vec<&Path> = config.model.candidates().collect();
        assert_eq!(candidates, vec![Path::new("a.onnx"), Path::new("b.onnx")]);
    }

    #[test]
    fn test_rejects_out_of_range_floor() {
        assert!(ServiceConfig::new().confidence_floor(1.0).validate().is_err());
        assert!(ServiceConfig::new().confidence_floor(-0.1).validate().is_err());
        assert!(
            ServiceConfig::new()
                .confidence_floor(f32::NAN)
                .validate()
                .is_err()
        );
        assert!(ServiceConfig::new().confidence_floor(0.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_pool_and_shape() {
        assert!(ServiceConfig::new().session_pool_size(0).validate().is_err());

        let mut config = ServiceConfig::new();
        config.input_shape = (0, 224);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unreasonable_thread_count() {
        let config = ServiceConfig::new().ort_session(OrtSessionConfig::new().with_intra_threads(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_MODEL_PATH, "/opt/models/leaf.onnx"),
            (ENV_CONFIDENCE_FLOOR, "0.05"),
        ]);
        let config = ServiceConfig::new()
            .apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.model.primary, PathBuf::from("/opt/models/leaf.onnx"));
        assert_eq!(config.confidence_floor, 0.05);
        assert_eq!(config.model.fallback, ModelPaths::default().fallback);
    }

    #[test]
    fn test_env_override_parse_failure() {
        let result = ServiceConfig::new().apply_overrides_from(|key| {
            (key == ENV_CONFIDENCE_FLOOR).then(|| "lots".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvOverride { .. })
        ));
    }

    #[test]
    fn test_from_json_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "model": {{ "primary": "custom.onnx" }}, "confidence_floor": 0.02 }}"#
        )
        .unwrap();

        let config = ServiceConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.model.primary, PathBuf::from("custom.onnx"));
        assert_eq!(config.model.fallback, None);
        assert_eq!(config.confidence_floor, 0.02);
        assert_eq!(config.input_shape, (224, 224));
        assert_eq!(config.session_pool_size, 1);
    }

    #[test]
    fn test_from_json_file_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = ServiceConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, LeafError::Json(_)));
    }
}
