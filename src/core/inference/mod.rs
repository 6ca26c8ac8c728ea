//! Structures and helpers for ONNX Runtime inference.
//!
//! [`ScoreModel`] is the seam between the classifier and whatever produces
//! class scores; [`OrtInfer`] is the production implementation.

pub mod ort_infer;
pub mod session;

pub use ort_infer::OrtInfer;
pub use session::load_session;

use crate::core::{Tensor4D, errors::LeafError};

/// Anything that turns a preprocessed image tensor into one score per class.
///
/// Implementations must be safe to share across threads: a single instance
/// serves every request for the life of the process.
pub trait ScoreModel: Send + Sync + std::fmt::Debug {
    /// Human-readable model name used in logs and error context.
    fn model_name(&self) -> &str;

    /// Runs exactly one forward pass over a `[1, H, W, 3]` tensor.
    fn scores(&self, input: &Tensor4D) -> Result<Vec<f32>, LeafError>;
}
