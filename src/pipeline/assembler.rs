//! Result assembly.
//!
//! Joins a [`ClassificationResult`] with the knowledge base and flattens it
//! into caller-facing types whose leaves are plain strings, floats and
//! booleans.

use crate::core::LeafError;
use crate::domain::{ClassLabel, ClassificationResult, DiseaseRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// A leaf value in serialized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Primitive {
    String(String),
    Float(f64),
    Bool(bool),
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::String(value.to_string())
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Primitive::String(value)
    }
}

impl From<f64> for Primitive {
    fn from(value: f64) -> Self {
        Primitive::Float(value)
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Primitive::Bool(value)
    }
}

/// Flattened disease metadata, keyed by field name.
pub type DiseaseInfo = BTreeMap<String, Primitive>;

/// Flattens `record` into [`DiseaseInfo`].
pub fn disease_info(record: &DiseaseRecord) -> DiseaseInfo {
    let mut info = DiseaseInfo::new();
    info.insert("scientific_name".into(), record.scientific_name.into());
    info.insert("type".into(), record.kind.into());
    info.insert("category".into(), record.category.as_str().into());
    info.insert("symptoms".into(), record.symptoms.into());
    info.insert("interventions".into(), record.interventions.render().into());
    info.insert("severity".into(), record.severity.as_str().into());
    info
}

/// The top prediction joined with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSummary {
    pub class: String,
    pub confidence: f64,
    pub disease_info: DiseaseInfo,
}

/// One ranked entry in wire form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub disease: String,
    pub confidence: f64,
    pub is_predicted: bool,
}

/// Assembled, fully primitive view of a classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledPrediction {
    pub prediction: PredictionSummary,
    pub all_predictions: Vec<RankedEntry>,
}

/// Joins `result` with the record returned by `lookup` for its top class.
///
/// A missing record is logged and degrades to an empty `disease_info`; it
/// never fails the assembly.
pub fn assemble<'a, F>(result: &ClassificationResult, lookup: F) -> AssembledPrediction
where
    F: FnOnce(ClassLabel) -> Option<&'a DiseaseRecord>,
{
    let label = result.predicted_class;
    let info = match lookup(label) {
        Some(record) => disease_info(record),
        None => {
            let err = LeafError::MetadataMissing {
                label: label.name().to_string(),
            };
            warn!(error = %err, "returning empty disease info");
            DiseaseInfo::new()
        }
    };

    AssembledPrediction {
        prediction: PredictionSummary {
            class: label.name().to_string(),
            confidence: f64::from(result.confidence),
            disease_info: info,
        },
        all_predictions: result
            .all_predictions
            .iter()
            .map(|entry| RankedEntry {
                disease: entry.disease.name().to_string(),
                confidence: f64::from(entry.confidence),
                is_predicted: entry.is_predicted,
            })
            .collect(),
    }
}

/// Response body for one prediction request.
///
/// Serializes as `{"success": true, "prediction": ..., "all_predictions": [...]}`
/// or `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictResponse {
    Success(AssembledPrediction),
    Failure { error: String },
}

impl PredictResponse {
    /// Failure response carrying the error's display text.
    pub fn failure(err: &LeafError) -> Self {
        PredictResponse::Failure {
            error: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictResponse::Success(_))
    }

    /// Serializes to a JSON string.
    pub fn to_json(&self) -> Result<String, LeafError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for PredictResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        match self {
            PredictResponse::Success(assembled) => {
                let mut state = serializer.serialize_struct("PredictResponse", 3)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("prediction", &assembled.prediction)?;
                state.serialize_field("all_predictions", &assembled.all_predictions)?;
                state.end()
            }
            PredictResponse::Failure { error } => {
                let mut state = serializer.serialize_struct("PredictResponse", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}
