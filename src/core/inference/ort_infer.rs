//! ONNX Runtime inference engine backed by a small pool of sessions.

use crate::core::{Tensor2D, Tensor4D, errors::LeafError};
use ort::{session::Session, value::ValueType};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

#[path = "ort_infer_builders.rs"]
mod ort_infer_builders;
#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;
#[cfg(test)]
#[path = "ort_infer_tests.rs"]
mod ort_infer_tests;

/// A loaded classifier.
///
/// Running a session needs exclusive access, so each session sits behind its
/// own mutex and requests are spread over the pool round-robin. Nothing else
/// in the struct changes after construction.
pub struct OrtInfer {
    pub(super) sessions: Vec<Mutex<Session>>,
    pub(super) next_idx: std::sync::atomic::AtomicUsize,
    pub(super) input_name: String,
    pub(super) output_name: String,
    pub(super) model_path: std::path::PathBuf,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Attempts to retrieve the primary input tensor shape from the first session.
    ///
    /// Dynamic dimensions (e.g., -1) are returned as-is.
    pub fn primary_input_shape(&self) -> Option<Vec<i64>> {
        let session_guard = lock_session(self.sessions.first()?, &self.model_name, 0);
        let input = session_guard.inputs.first()?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Rejects a model whose declared input cannot take `[1, height, width, 3]`.
    ///
    /// Dynamic dimensions accept any size; a model that declares no tensor
    /// input shape is accepted as-is.
    pub fn ensure_input_shape(&self, input_shape: (u32, u32)) -> Result<(), LeafError> {
        let Some(declared) = self.primary_input_shape() else {
            return Ok(());
        };
        if declared_shape_accepts(&declared, input_shape) {
            return Ok(());
        }
        let (height, width) = input_shape;
        Err(LeafError::model_load_error(
            &self.model_path,
            &format!("model input {declared:?} does not accept [1, {height}, {width}, 3] from"),
            Some("the classifier expects NHWC input"),
            None,
        ))
    }

    /// Returns the model path associated with this inference engine.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Number of sessions in the pool.
    pub fn pool_size(&self) -> usize {
        self.sessions.len()
    }
}

/// True when a declared input shape can take a `[1, height, width, 3]` tensor.
/// Negative dimensions are dynamic.
pub(crate) fn declared_shape_accepts(declared: &[i64], (height, width): (u32, u32)) -> bool {
    let expected = [1, i64::from(height), i64::from(width), 3];
    declared.len() == expected.len()
        && declared
            .iter()
            .zip(expected)
            .all(|(&dim, want)| dim < 0 || dim == want)
}

/// Locks a pooled session, recovering it if a previous holder panicked.
///
/// A panic while holding the lock cannot leave the runtime session half
/// updated, so the poison flag is cleared instead of failing every later
/// request on this slot.
pub(crate) fn lock_session<'a, T>(
    session: &'a Mutex<T>,
    model_name: &str,
    idx: usize,
) -> MutexGuard<'a, T> {
    match session.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                model = model_name,
                session = idx,
                "session lock poisoned by an earlier panic; recovering"
            );
            session.clear_poison();
            poisoned.into_inner()
        }
    }
}

impl super::ScoreModel for OrtInfer {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn scores(&self, input: &Tensor4D) -> Result<Vec<f32>, LeafError> {
        let output: Tensor2D = self.infer_2d(input)?;
        if output.nrows() != 1 {
            return Err(LeafError::inference_error(
                &self.model_name,
                &format!("expected a single output row, got {}", output.nrows()),
                crate::core::errors::SimpleError::new("unexpected batch dimension"),
            ));
        }
        Ok(output.row(0).to_vec())
    }
}
