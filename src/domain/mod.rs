//! Domain types: class labels, the disease knowledge base, model
//! evaluation metrics and classification results.

pub mod knowledge;
pub mod labels;
pub mod metrics;
pub mod prediction;

pub use knowledge::{DiseaseCategory, DiseaseRecord, Interventions, Severity};
pub use labels::{CLASS_COUNT, ClassLabel, LabelOrder};
pub use metrics::{ClassMetrics, ModelMetrics};
pub use prediction::{ClassificationResult, PredictionEntry};
