//! Request pipeline: result assembly and the service entry points.
//!
//! # Modules
//!
//! * `assembler` - Joins a classification with the knowledge base into wire types
//! * `service` - [`DiagnosisService`], the object request handlers share

pub mod assembler;
pub mod service;

pub use assembler::{
    AssembledPrediction, DiseaseInfo, PredictResponse, PredictionSummary, Primitive, RankedEntry,
    assemble, disease_info,
};
pub use service::{DiagnosisService, RequestStage, error_payload};
