//! Evaluation metrics of the shipped classifier.
//!
//! Figures from the held-out test set the `mobilenet-tomato-v1` model was
//! evaluated on. Like the knowledge base, [`class_metrics`] is an exhaustive
//! `match`, so every label has an entry.

use crate::domain::labels::ClassLabel;
use serde::Serialize;

/// Precision, recall and F1 for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: ClassLabel,
    pub precision: f32,
    pub recall: f32,
    pub f1_score: f32,
}

/// Aggregate figures over the whole test set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub accuracy: f32,
    pub precision: f32,
    pub recall: f32,
    pub f1_score: f32,
    pub test_images: u32,
}

/// Overall metrics of the shipped model.
pub const OVERALL: ModelMetrics = ModelMetrics {
    accuracy: 0.95,
    precision: 0.93,
    recall: 0.93,
    f1_score: 0.93,
    test_images: 2189,
};

const fn entry(label: ClassLabel, precision: f32, recall: f32, f1_score: f32) -> ClassMetrics {
    ClassMetrics {
        label,
        precision,
        recall,
        f1_score,
    }
}

/// Metrics for `label`. Total over every label.
pub const fn class_metrics(label: ClassLabel) -> ClassMetrics {
    match label {
        ClassLabel::BacterialSpot => entry(label, 0.95, 0.96, 0.96),
        ClassLabel::EarlyBlight => entry(label, 0.90, 0.78, 0.84),
        ClassLabel::LateBlight => entry(label, 0.96, 0.97, 0.96),
        ClassLabel::LeafMold => entry(label, 0.92, 0.94, 0.93),
        ClassLabel::SeptoriaLeafSpot => entry(label, 0.92, 0.94, 0.93),
        ClassLabel::TwoSpottedSpiderMite => entry(label, 0.93, 0.92, 0.93),
        ClassLabel::TargetSpot => entry(label, 0.88, 0.87, 0.88),
        ClassLabel::YellowLeafCurlVirus => entry(label, 1.00, 0.99, 0.99),
        ClassLabel::MosaicVirus => entry(label, 0.93, 0.91, 0.92),
        ClassLabel::Healthy => entry(label, 0.94, 0.98, 0.96),
    }
}

/// Per-class metrics in [`ClassLabel::ALL`] order.
pub fn all() -> impl Iterator<Item = ClassMetrics> {
    ClassLabel::ALL.into_iter().map(class_metrics)
}

/// The class the model is least reliable on, by F1 score.
pub fn weakest_class() -> Option<ClassMetrics> {
    all().min_by(|a, b| a.f1_score.total_cmp(&b.f1_score))
}
