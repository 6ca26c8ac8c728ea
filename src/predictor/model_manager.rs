//! Model lifecycle.
//!
//! A [`ModelManager`] owns the one classifier handle of a service. The handle
//! is produced at most once, either eagerly or by whichever request first
//! needs it; concurrent first users block on the same initialization. A
//! missing or unparseable artifact leaves the manager in
//! [`ModelState::NotLoaded`], which every caller checks explicitly.

use crate::core::config::{ModelPaths, ServiceConfig};
use crate::core::{LeafError, OrtInfer, ScoreModel};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Turns a model path into a ready-to-run model.
pub type ModelLoader = dyn Fn(&Path) -> Result<Arc<dyn ScoreModel>, LeafError> + Send + Sync;

/// Outcome of the one-time load.
#[derive(Debug, Clone)]
pub enum ModelState {
    /// A model is available.
    Loaded(Arc<dyn ScoreModel>),
    /// No candidate path produced a model.
    NotLoaded {
        /// Why each candidate was rejected.
        reason: String,
    },
}

impl ModelState {
    /// True when a model is available.
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }
}

/// Owns the process-wide classifier handle.
pub struct ModelManager {
    paths: ModelPaths,
    loader: Box<ModelLoader>,
    state: OnceCell<ModelState>,
}

impl std::fmt::Debug for ModelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelManager")
            .field("paths", &self.paths)
            .field("state", &self.state.get())
            .finish()
    }
}

impl ModelManager {
    /// Creates a manager that loads ONNX models as described by `config`.
    ///
    /// A model whose declared input does not match `config.input_shape` is
    /// rejected like an unparseable one, so the fallback gets its turn.
    ///
    /// Nothing is loaded until [`get_or_load`](Self::get_or_load) is called.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let input_name = config.input_name.clone();
        let pool_size = config.session_pool_size;
        let ort_config = config.ort_session.clone();
        let input_shape = config.input_shape;
        Self::with_loader(config.model.clone(), move |path| {
            let model = OrtInfer::with_pool(
                path,
                input_name.as_deref(),
                pool_size,
                ort_config.as_ref(),
            )?;
            model.ensure_input_shape(input_shape)?;
            Ok(Arc::new(model) as Arc<dyn ScoreModel>)
        })
    }

    /// Creates a manager that loads through a custom `loader`.
    pub fn with_loader<F>(paths: ModelPaths, loader: F) -> Self
    where
        F: Fn(&Path) -> Result<Arc<dyn ScoreModel>, LeafError> + Send + Sync + 'static,
    {
        Self {
            paths,
            loader: Box::new(loader),
            state: OnceCell::new(),
        }
    }

    /// Creates a manager around an already-built model.
    pub fn with_model(model: Arc<dyn ScoreModel>) -> Self {
        Self::with_state(ModelState::Loaded(model))
    }

    /// Creates a manager that has no model.
    pub fn not_loaded(reason: impl Into<String>) -> Self {
        Self::with_state(ModelState::NotLoaded {
            reason: reason.into(),
        })
    }

    fn with_state(state: ModelState) -> Self {
        Self {
            paths: ModelPaths::default(),
            loader: Box::new(|path| {
                Err(LeafError::model_not_loaded(format!(
                    "no loader configured for '{}'",
                    path.display()
                )))
            }),
            state: OnceCell::with_value(state),
        }
    }

    /// Returns the model state, loading on first use.
    pub fn get_or_load(&self) -> &ModelState {
        self.state.get_or_init(|| self.load())
    }

    /// Returns the model state if loading has already happened.
    pub fn state(&self) -> Option<&ModelState> {
        self.state.get()
    }

    /// Returns the loaded model, loading on first use.
    ///
    /// # Errors
    ///
    /// `ModelNotLoaded` carrying the recorded reason.
    pub fn model(&self) -> Result<Arc<dyn ScoreModel>, LeafError> {
        match self.get_or_load() {
            ModelState::Loaded(model) => Ok(Arc::clone(model)),
            ModelState::NotLoaded { reason } => Err(LeafError::model_not_loaded(reason.clone())),
        }
    }

    /// True once a model is available, loading on first use.
    pub fn is_loaded(&self) -> bool {
        self.get_or_load().is_loaded()
    }

    fn load(&self) -> ModelState {
        let mut failures = Vec::new();
        for path in self.paths.candidates() {
            if !path.exists() {
                failures.push(format!("'{}' not found", path.display()));
                continue;
            }
            match (self.loader)(path) {
                Ok(model) => {
                    info!(
                        path = %path.display(),
                        model = model.model_name(),
                        "classifier model loaded"
                    );
                    return ModelState::Loaded(model);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to load classifier model");
                    failures.push(match err {
                        LeafError::ModelNotLoaded { reason } => reason,
                        other => format!("'{}': {other}", path.display()),
                    });
                }
            }
        }

        let reason = failures.join("; ");
        warn!(%reason, "classifier model not loaded; predictions will fail");
        ModelState::NotLoaded { reason }
    }
}
