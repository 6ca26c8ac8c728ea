//! Predictors: model lifecycle and the leaf disease classifier.

pub mod leaf_classifier;
pub mod model_manager;

pub use leaf_classifier::LeafClassifier;
pub use model_manager::{ModelLoader, ModelManager, ModelState};
