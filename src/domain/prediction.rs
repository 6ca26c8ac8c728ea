//! Classification result types.

use crate::domain::labels::ClassLabel;
use serde::Serialize;

/// One ranked class with its raw model score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionEntry {
    pub disease: ClassLabel,
    pub confidence: f32,
    pub is_predicted: bool,
}

/// Outcome of classifying one image.
///
/// `all_predictions` is sorted by confidence descending, holds only entries
/// above the confidence floor plus the predicted class, and marks exactly
/// one entry (the one for `predicted_class`) as predicted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub predicted_class: ClassLabel,
    pub confidence: f32,
    pub all_predictions: Vec<PredictionEntry>,
}

impl ClassificationResult {
    /// The entry flagged as the prediction.
    pub fn predicted_entry(&self) -> Option<&PredictionEntry> {
        self.all_predictions.iter().find(|entry| entry.is_predicted)
    }

    /// True when the classifier found no disease.
    pub fn is_healthy(&self) -> bool {
        self.predicted_class.is_healthy()
    }
}
