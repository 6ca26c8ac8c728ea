//! Ranking of raw classifier scores.

use crate::core::config::DEFAULT_CONFIDENCE_FLOOR;
use crate::core::{LeafError, SimpleError};
use crate::domain::{ClassificationResult, LabelOrder, PredictionEntry};
use std::cmp::Ordering;

/// Turns a raw score vector into a [`ClassificationResult`].
#[derive(Debug, Clone)]
pub struct Ranker {
    order: LabelOrder,
    confidence_floor: f32,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(LabelOrder::V1, DEFAULT_CONFIDENCE_FLOOR)
    }
}

impl Ranker {
    /// Creates a ranker for `order` that drops entries scoring at or below
    /// `confidence_floor`.
    pub fn new(order: LabelOrder, confidence_floor: f32) -> Self {
        Self {
            order,
            confidence_floor,
        }
    }

    /// Label order used to interpret score positions.
    pub fn order(&self) -> &LabelOrder {
        &self.order
    }

    /// Entries scoring at or below this value are dropped.
    pub fn confidence_floor(&self) -> f32 {
        self.confidence_floor
    }

    /// Ranks `scores`.
    ///
    /// The arg-max (lowest index among equal maxima) becomes the prediction
    /// and its entry is always kept. Other entries survive only above the
    /// floor. Survivors are sorted by score descending, ties by ascending
    /// class index. Scores are reported as given, never renormalized.
    ///
    /// # Errors
    ///
    /// Returns an `Inference` error when the vector length does not match
    /// the label order or a score is not finite.
    pub fn rank(&self, scores: &[f32]) -> Result<ClassificationResult, LeafError> {
        if scores.len() != self.order.len() {
            return Err(LeafError::inference_error(
                self.order.version(),
                &format!(
                    "classifier produced {} scores for {} labels",
                    scores.len(),
                    self.order.len()
                ),
                SimpleError::new("score vector length mismatch"),
            ));
        }
        if let Some(idx) = scores.iter().position(|s| !s.is_finite()) {
            return Err(LeafError::inference_error(
                self.order.version(),
                &format!("score at index {idx} is {}", scores[idx]),
                SimpleError::new("non-finite classifier score"),
            ));
        }

        let mut best = 0;
        for (idx, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = idx;
            }
        }

        let mut ranked: Vec<(usize, PredictionEntry)> = self
            .order
            .labels()
            .iter()
            .zip(scores)
            .enumerate()
            .filter(|&(idx, (_, &score))| idx == best || score > self.confidence_floor)
            .map(|(idx, (&label, &score))| {
                (
                    idx,
                    PredictionEntry {
                        disease: label,
                        confidence: score,
                        is_predicted: idx == best,
                    },
                )
            })
            .collect();

        ranked.sort_by(|(ia, a), (ib, b)| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then(ia.cmp(ib))
        });

        Ok(ClassificationResult {
            predicted_class: self.order.labels()[best],
            confidence: scores[best],
            all_predictions: ranked.into_iter().map(|(_, entry)| entry).collect(),
        })
    }
}

/// Ranks `scores` against [`LabelOrder::V1`] with the default floor.
pub fn rank_scores(scores: &[f32]) -> Result<ClassificationResult, LeafError> {
    Ranker::default().rank(scores)
}
