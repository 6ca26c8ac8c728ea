//! Class labels and the order that binds them to classifier outputs.
//!
//! The classifier emits one score per class, and position `i` of that vector
//! means whatever [`LabelOrder`] says is at position `i`. The order is data,
//! not an accident of container iteration, and each order carries a version
//! so a retrained model with a different head can ship a new one.

use crate::core::errors::LeafError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of classes the classifier distinguishes.
pub const CLASS_COUNT: usize = 10;

/// One of the fixed categories a classification can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassLabel {
    #[serde(rename = "Bacterial Spot")]
    BacterialSpot,
    #[serde(rename = "Early Blight")]
    EarlyBlight,
    #[serde(rename = "Late Blight")]
    LateBlight,
    #[serde(rename = "Leaf Mold")]
    LeafMold,
    #[serde(rename = "Septoria Leaf Spot")]
    SeptoriaLeafSpot,
    #[serde(rename = "Two-Spotted Spider Mite")]
    TwoSpottedSpiderMite,
    #[serde(rename = "Target Spot")]
    TargetSpot,
    #[serde(rename = "Tomato Yellow Leaf Curl Virus")]
    YellowLeafCurlVirus,
    #[serde(rename = "Tomato Mosaic Virus")]
    MosaicVirus,
    #[serde(rename = "Healthy Plant")]
    Healthy,
}

impl ClassLabel {
    /// Every label, in declaration order.
    pub const ALL: [ClassLabel; CLASS_COUNT] = [
        ClassLabel::BacterialSpot,
        ClassLabel::EarlyBlight,
        ClassLabel::LateBlight,
        ClassLabel::LeafMold,
        ClassLabel::SeptoriaLeafSpot,
        ClassLabel::TwoSpottedSpiderMite,
        ClassLabel::TargetSpot,
        ClassLabel::YellowLeafCurlVirus,
        ClassLabel::MosaicVirus,
        ClassLabel::Healthy,
    ];

    /// Display name, as used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            ClassLabel::BacterialSpot => "Bacterial Spot",
            ClassLabel::EarlyBlight => "Early Blight",
            ClassLabel::LateBlight => "Late Blight",
            ClassLabel::LeafMold => "Leaf Mold",
            ClassLabel::SeptoriaLeafSpot => "Septoria Leaf Spot",
            ClassLabel::TwoSpottedSpiderMite => "Two-Spotted Spider Mite",
            ClassLabel::TargetSpot => "Target Spot",
            ClassLabel::YellowLeafCurlVirus => "Tomato Yellow Leaf Curl Virus",
            ClassLabel::MosaicVirus => "Tomato Mosaic Virus",
            ClassLabel::Healthy => "Healthy Plant",
        }
    }

    /// True for the "no disease" pseudo-category.
    pub const fn is_healthy(self) -> bool {
        matches!(self, ClassLabel::Healthy)
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClassLabel {
    type Err = LeafError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClassLabel::ALL
            .into_iter()
            .find(|label| label.name() == s)
            .ok_or_else(|| LeafError::invalid_input(format!("unknown class label '{s}'")))
    }
}

/// Versioned mapping from classifier output index to [`ClassLabel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelOrder {
    version: &'static str,
    labels: [ClassLabel; CLASS_COUNT],
}

impl LabelOrder {
    /// Output order of the MobileNet fine-tuned tomato classifier.
    pub const V1: LabelOrder = LabelOrder {
        version: "mobilenet-tomato-v1",
        labels: [
            ClassLabel::BacterialSpot,
            ClassLabel::EarlyBlight,
            ClassLabel::LateBlight,
            ClassLabel::LeafMold,
            ClassLabel::SeptoriaLeafSpot,
            ClassLabel::TwoSpottedSpiderMite,
            ClassLabel::TargetSpot,
            ClassLabel::YellowLeafCurlVirus,
            ClassLabel::MosaicVirus,
            ClassLabel::Healthy,
        ],
    };

    /// Builds an order, rejecting any sequence that is not a permutation of
    /// all labels.
    pub fn new(version: &'static str, labels: [ClassLabel; CLASS_COUNT]) -> Result<Self, LeafError> {
        for label in ClassLabel::ALL {
            let count = labels.iter().filter(|&&l| l == label).count();
            if count != 1 {
                return Err(LeafError::config_error(format!(
                    "label order '{version}' lists '{label}' {count} times"
                )));
            }
        }
        Ok(Self { version, labels })
    }

    /// Version tag of this order.
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Labels in output-index order.
    pub fn labels(&self) -> &[ClassLabel] {
        &self.labels
    }

    /// Label for output index `index`.
    pub fn label_at(&self, index: usize) -> Option<ClassLabel> {
        self.labels.get(index).copied()
    }

    /// Output index for `label`.
    pub fn index_of(&self, label: ClassLabel) -> Option<usize> {
        self.labels.iter().position(|&l| l == label)
    }

    /// Number of classifier outputs.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for LabelOrder {
    fn default() -> Self {
        Self::V1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_is_a_permutation() {
        let v1 = LabelOrder::V1;
        assert!(LabelOrder::new(v1.version(), v1.labels).is_ok());
        assert_eq!(v1.len(), CLASS_COUNT);
    }

    #[test]
    fn test_v1_positions_match_classifier_head() {
        let v1 = LabelOrder::V1;
        assert_eq!(v1.label_at(0), Some(ClassLabel::BacterialSpot));
        assert_eq!(v1.label_at(5), Some(ClassLabel::TwoSpottedSpiderMite));
        assert_eq!(v1.label_at(9), Some(ClassLabel::Healthy));
        assert_eq!(v1.label_at(10), None);
        assert_eq!(v1.index_of(ClassLabel::MosaicVirus), Some(8));
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let mut labels = ClassLabel::ALL;
        labels[3] = ClassLabel::Healthy;
        let err = LabelOrder::new("broken", labels).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        for label in ClassLabel::ALL {
            assert_eq!(label.name().parse::<ClassLabel>().unwrap(), label);
        }
        assert!("Powdery Mildew".parse::<ClassLabel>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&ClassLabel::YellowLeafCurlVirus).unwrap();
        assert_eq!(json, "\"Tomato Yellow Leaf Curl Virus\"");
        let back: ClassLabel = serde_json::from_str("\"Healthy Plant\"").unwrap();
        assert_eq!(back, ClassLabel::Healthy);
    }

    #[test]
    fn test_only_healthy_is_healthy() {
        let healthy: Vec<_> = ClassLabel::ALL.into_iter().filter(|l| l.is_healthy()).collect();
        assert_eq!(healthy, vec![ClassLabel::Healthy]);
    }
}
