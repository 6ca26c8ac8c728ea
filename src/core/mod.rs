//! Core building blocks shared by the rest of the crate.
//!
//! This module contains:
//! - Configuration types and validation
//! - Error handling
//! - ONNX Runtime integration and the [`ScoreModel`] seam
//! - Tensor type aliases

pub mod config;
pub mod errors;
pub mod inference;

pub use config::{ConfigError, ConfigValidator, ModelPaths, OrtSessionConfig, ServiceConfig};
pub use errors::{ErrorKind, LeafError, SimpleError};
pub use inference::{OrtInfer, ScoreModel, load_session};

/// Type alias for 2D tensors (batch, classes).
pub type Tensor2D = ndarray::Array2<f32>;

/// Type alias for 4D tensors (batch, height, width, channels).
pub type Tensor4D = ndarray::Array4<f32>;

/// Result type used throughout the crate.
pub type LeafResult<T> = Result<T, LeafError>;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
