//! # leafscan
//!
//! Tomato leaf disease classification with ONNX Runtime.
//!
//! Takes a decoded RGB image, runs a 10-class MobileNet classifier on it and
//! joins the top prediction with a built-in disease knowledge base.
//!
//! ## Features
//!
//! - One-time model loading with a primary and a fallback model path
//! - Deterministic bicubic preprocessing to the classifier input shape
//! - Ranked predictions with a configurable confidence floor and stable tie-breaking
//! - Static, compile-time complete disease knowledge base
//! - JSON response shapes for HTTP delivery layers
//!
//! ## Modules
//!
//! * [`core`] - Configuration, error handling and ONNX Runtime integration
//! * [`domain`] - Class labels, disease records, model metrics and classification results
//! * [`processors`] - Preprocessing and score ranking
//! * [`predictor`] - Model lifecycle and the leaf classifier
//! * [`pipeline`] - Result assembly and the [`DiagnosisService`](pipeline::DiagnosisService) entry points
//! * [`utils`] - Image decoding helpers for callers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use leafscan::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::with_model_path("models/tomato_disease.onnx");
//! let service = DiagnosisService::new(&config)?;
//!
//! let image = load_image(Path::new("leaf.jpg"))?;
//! let response = service.predict_response(&image);
//! println!("{}", response.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ### JSON Configuration
//!
//! ```rust,no_run
//! use leafscan::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config: ServiceConfig = serde_json::from_str(r#"
//! {
//!   "model": {
//!     "primary": "models/tomato_disease.onnx",
//!     "fallback": "../models/best_mobilenet_finetuned.onnx"
//!   },
//!   "confidence_floor": 0.01,
//!   "session_pool_size": 2
//! }
//! "#)?;
//!
//! let service = DiagnosisService::new(&config.apply_env_overrides()?)?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;

pub mod pipeline;
pub mod predictor;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use leafscan::prelude::*;
/// ```
///
/// Covers building the service, reading results and loading images. Lower
/// level pieces (ranking, model manager, ONNX sessions) are imported from
/// their modules.
pub mod prelude {
    // Service (essential)
    pub use crate::core::config::ServiceConfig;
    pub use crate::pipeline::{DiagnosisService, PredictResponse};

    // Results
    pub use crate::domain::{ClassLabel, ClassificationResult, DiseaseRecord, Severity};

    // Error Handling (essential)
    pub use crate::core::{ErrorKind, LeafError, LeafResult};

    // Image Utility (minimal)
    pub use crate::utils::{decode_image, load_image};
}
