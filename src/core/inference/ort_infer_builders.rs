use super::*;
use crate::core::config::OrtSessionConfig;
use crate::core::inference::session;
use ort::logging::LogLevel;
use std::path::Path;

impl OrtInfer {
    /// Creates a new OrtInfer instance with default ONNX Runtime settings and a single session.
    ///
    /// The input and output tensor names are taken from the model when
    /// `input_name` is `None`.
    pub fn new(model_path: impl AsRef<Path>, input_name: Option<&str>) -> Result<Self, LeafError> {
        Self::with_pool(model_path, input_name, 1, None)
    }

    /// Creates a new OrtInfer instance with `pool_size` sessions, applying the
    /// optional ORT session configuration to each of them.
    pub fn with_pool(
        model_path: impl AsRef<Path>,
        input_name: Option<&str>,
        pool_size: usize,
        ort_config: Option<&OrtSessionConfig>,
    ) -> Result<Self, LeafError> {
        let path = model_path.as_ref();
        let pool_size = pool_size.max(1);
        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let session = session::load_session_with(
                path,
                |builder| match ort_config {
                    Some(cfg) => cfg.apply(builder),
                    None => builder.with_log_level(LogLevel::Error),
                },
                Some("check the model file and ONNX Runtime configuration"),
            )?;
            sessions.push(Mutex::new(session));
        }

        let (discovered_input, output_name) = {
            let guard = lock_session(&sessions[0], &model_name, 0);
            let input = guard.inputs.first().map(|i| i.name.clone());
            let output = guard.outputs.first().map(|o| o.name.clone());
            (input, output)
        };

        let input_name = match input_name {
            Some(name) => name.to_string(),
            None => discovered_input.ok_or_else(|| {
                LeafError::model_load_error(path, "model declares no inputs", None, None)
            })?,
        };
        let output_name = output_name.ok_or_else(|| {
            LeafError::model_load_error(
                path,
                "model declares no outputs",
                Some("model may be invalid or corrupted"),
                None,
            )
        })?;

        Ok(OrtInfer {
            sessions,
            next_idx: std::sync::atomic::AtomicUsize::new(0),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            model_name,
        })
    }
}
