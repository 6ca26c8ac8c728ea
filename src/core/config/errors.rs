//! Configuration error types and validation traits.

use crate::core::errors::LeafError;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Error indicating that a configuration value is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that an environment override could not be parsed.
    #[error("invalid value for {variable}: {value}")]
    InvalidEnvOverride { variable: String, value: String },
}

impl From<ConfigError> for LeafError {
    fn from(err: ConfigError) -> Self {
        LeafError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// A trait for validating configuration parameters.
///
/// Implementors provide `validate`; the helper methods cover the checks
/// shared between configuration types.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Validates that both image dimensions are positive.
    fn validate_image_dimensions(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("Image dimensions must be positive, got {width}x{height}"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a confidence floor, which must lie in `[0, 1)`.
    fn validate_confidence_floor(&self, floor: f32) -> Result<(), ConfigError> {
        if !floor.is_finite() || !(0.0..1.0).contains(&floor) {
            Err(ConfigError::InvalidConfig {
                message: format!("Confidence floor must be in [0, 1), got {floor}"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a count is greater than zero.
    fn validate_positive_usize(&self, value: usize, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must be greater than 0, got {value}"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a thread count against a sane upper bound.
    fn validate_thread_count(&self, thread_count: usize) -> Result<(), ConfigError> {
        const MAX_REASONABLE_THREADS: usize = 256;

        if thread_count == 0 || thread_count > MAX_REASONABLE_THREADS {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "Thread count must be between 1 and {MAX_REASONABLE_THREADS}, got {thread_count}"
                ),
            })
        } else {
            Ok(())
        }
    }
}

/// Extension that lifts validation failures into [`LeafError`].
pub trait ConfigValidatorExt: ConfigValidator {
    /// Validates and wraps any error into `LeafError::ConfigError`.
    fn validate_and_wrap(&self) -> Result<(), LeafError> {
        self.validate().map_err(LeafError::from)
    }
}

impl<T: ConfigValidator> ConfigValidatorExt for T {}
