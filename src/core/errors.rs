//! Error types for the diagnosis core.
//!
//! Every failure a request can hit maps onto one of four kinds: the model is
//! not loaded, the input image is unusable, the forward pass failed, or the
//! knowledge base has no record for a label. Startup problems (bad
//! configuration, unreadable config files) get their own variants so callers
//! can tell them apart from per-request failures.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Coarse error classification exposed to the delivery layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The model artifact is missing or could not be parsed.
    ModelNotLoaded,
    /// The caller supplied an image that cannot be classified.
    InvalidInput,
    /// The forward pass or its output handling failed.
    InferenceError,
    /// The knowledge base has no record for a label.
    MetadataMissing,
    /// Invalid configuration or unreadable configuration source.
    Configuration,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ModelNotLoaded => write!(f, "model not loaded"),
            ErrorKind::InvalidInput => write!(f, "invalid input"),
            ErrorKind::InferenceError => write!(f, "inference error"),
            ErrorKind::MetadataMissing => write!(f, "metadata missing"),
            ErrorKind::Configuration => write!(f, "configuration"),
        }
    }
}

/// Errors produced by the diagnosis core.
#[derive(Error, Debug)]
pub enum LeafError {
    /// No model handle is available; `reason` records why loading failed.
    #[error("model not loaded")]
    ModelNotLoaded {
        /// Why the model could not be loaded.
        reason: String,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error occurred during inference.
    #[error("inference failed for model '{model_name}': {context}")]
    Inference {
        /// Name of the model that failed.
        model_name: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The knowledge base has no record for a label.
    #[error("no disease record for '{label}'")]
    MetadataMissing {
        /// The label that could not be resolved.
        label: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error occurred while loading or decoding an image.
    #[error("image load: {0}")]
    ImageLoad(#[source] image::ImageError),

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("json")]
    Json(#[from] serde_json::Error),
}

/// Plain message error used when a failure has no richer cause.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new simple error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SimpleError {}

impl LeafError {
    /// Classifies this error into the request-level taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LeafError::ModelNotLoaded { .. } => ErrorKind::ModelNotLoaded,
            LeafError::InvalidInput { .. } | LeafError::ImageLoad(_) => ErrorKind::InvalidInput,
            LeafError::Inference { .. } | LeafError::Session(_) | LeafError::Tensor(_) => {
                ErrorKind::InferenceError
            }
            LeafError::MetadataMissing { .. } => ErrorKind::MetadataMissing,
            LeafError::ConfigError { .. } | LeafError::Io(_) | LeafError::Json(_) => {
                ErrorKind::Configuration
            }
        }
    }

    /// Creates a `ModelNotLoaded` error with the given reason.
    pub fn model_not_loaded(reason: impl Into<String>) -> Self {
        Self::ModelNotLoaded {
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a `ConfigError`.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates an `Inference` error, preserving the underlying cause.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Name of the model that failed.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn inference_error(
        model_name: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an error for a model file that could not be turned into a session.
    ///
    /// The result is a `ModelNotLoaded` whose reason names the path, the
    /// failure, an optional suggestion, and the underlying cause if any.
    pub fn model_load_error(
        path: &Path,
        context: &str,
        suggestion: Option<&str>,
        source: Option<ort::Error>,
    ) -> Self {
        let mut reason = format!("{} '{}'", context, path.display());
        if let Some(source) = source {
            reason.push_str(&format!(": {source}"));
        }
        if let Some(suggestion) = suggestion {
            reason.push_str(&format!(" ({suggestion})"));
        }
        Self::ModelNotLoaded { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_model_not_loaded_message_is_stable() {
        let err = LeafError::model_not_loaded("file missing");
        assert_eq!(err.to_string(), "model not loaded");
        assert_eq!(err.kind(), ErrorKind::ModelNotLoaded);
    }

    #[test]
    fn test_inference_error_preserves_source() {
        let err = LeafError::inference_error(
            "mobilenet",
            "forward pass",
            SimpleError::new("session exploded"),
        );
        assert_eq!(err.kind(), ErrorKind::InferenceError);
        let source = err.source().expect("source should be preserved");
        assert_eq!(source.to_string(), "session exploded");
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            LeafError::invalid_input("empty").kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            LeafError::MetadataMissing {
                label: "x".to_string()
            }
            .kind(),
            ErrorKind::MetadataMissing
        );
        assert_eq!(
            LeafError::config_error("bad").kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_model_load_error_reason_mentions_path() {
        let err = LeafError::model_load_error(
            Path::new("models/missing.onnx"),
            "failed to create ONNX session",
            Some("verify model file exists and is readable"),
            None,
        );
        match err {
            LeafError::ModelNotLoaded { reason } => {
                assert!(reason.contains("models/missing.onnx"));
                assert!(reason.contains("verify model file"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::ModelNotLoaded).unwrap();
        assert_eq!(json, "\"model_not_loaded\"");
    }
}
