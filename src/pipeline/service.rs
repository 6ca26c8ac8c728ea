//! Diagnosis service entry points.
//!
//! [`DiagnosisService`] is built once at process start and shared by
//! reference with request handlers. It owns the model handle through its
//! [`LeafClassifier`]; there is no global state.

use crate::core::config::ServiceConfig;
use crate::core::{ErrorKind, LeafError};
use crate::domain::{
    ClassLabel, ClassMetrics, ClassificationResult, DiseaseRecord, knowledge, metrics,
};
use crate::pipeline::assembler::{PredictResponse, assemble};
use crate::predictor::{LeafClassifier, ModelManager};
use image::RgbImage;
use std::fmt;
use tracing::debug;

/// Progress of a single prediction request.
///
/// `Received -> Preprocessed -> Classified -> Assembled -> Done`, with
/// `Failed` reachable from every non-terminal stage. A request that returns
/// the bare classification finishes straight from `Classified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Received,
    Preprocessed,
    Classified,
    Assembled,
    Done,
    Failed(ErrorKind),
}

impl RequestStage {
    /// True for `Done` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStage::Done | RequestStage::Failed(_))
    }

    /// The stage that follows a successful step, or `None` from a terminal
    /// stage.
    pub fn next(self) -> Option<RequestStage> {
        match self {
            RequestStage::Received => Some(RequestStage::Preprocessed),
            RequestStage::Preprocessed => Some(RequestStage::Classified),
            RequestStage::Classified => Some(RequestStage::Assembled),
            RequestStage::Assembled => Some(RequestStage::Done),
            RequestStage::Done | RequestStage::Failed(_) => None,
        }
    }

    /// `Done` when the request can finish from this stage.
    pub fn finish(self) -> Option<RequestStage> {
        matches!(self, RequestStage::Classified | RequestStage::Assembled)
            .then_some(RequestStage::Done)
    }

    /// The failed stage for `err`, or `None` from a terminal stage.
    pub fn fail(self, err: &LeafError) -> Option<RequestStage> {
        (!self.is_terminal()).then(|| RequestStage::Failed(err.kind()))
    }
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStage::Received => f.write_str("received"),
            RequestStage::Preprocessed => f.write_str("preprocessed"),
            RequestStage::Classified => f.write_str("classified"),
            RequestStage::Assembled => f.write_str("assembled"),
            RequestStage::Done => f.write_str("done"),
            RequestStage::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}

/// Tracks one request through its stages, logging every transition.
#[derive(Debug)]
struct RequestTrace {
    stage: RequestStage,
}

impl RequestTrace {
    fn start() -> Self {
        debug!(stage = %RequestStage::Received, "prediction request");
        Self {
            stage: RequestStage::Received,
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            debug!(from = %self.stage, to = %next, "prediction request");
            self.stage = next;
        }
    }

    fn fail(&mut self, err: &LeafError) {
        if let Some(failed) = self.stage.fail(err) {
            debug!(from = %self.stage, to = %failed, error = %err, "prediction request");
            self.stage = failed;
        }
    }

    fn finish(&mut self) {
        if let Some(done) = self.stage.finish() {
            debug!(from = %self.stage, to = %done, "prediction request");
            self.stage = done;
        }
    }

    /// Records the outcome of one step and passes it through.
    fn step<T>(&mut self, outcome: Result<T, LeafError>) -> Result<T, LeafError> {
        match &outcome {
            Ok(_) => self.advance(),
            Err(err) => self.fail(err),
        }
        outcome
    }
}

/// The diagnosis core as seen by a delivery layer.
#[derive(Debug)]
pub struct DiagnosisService {
    classifier: LeafClassifier,
}

impl DiagnosisService {
    /// Validates `config` and builds the service, loading the model now when
    /// `config.eager_load` is set.
    ///
    /// A model that cannot be loaded does not fail construction; predictions
    /// then report `model not loaded`.
    pub fn new(config: &ServiceConfig) -> Result<Self, LeafError> {
        Ok(Self {
            classifier: LeafClassifier::from_config(config)?,
        })
    }

    /// Builds the service around an existing model manager, e.g. one holding
    /// a fake model.
    pub fn with_model_manager(
        config: &ServiceConfig,
        models: ModelManager,
    ) -> Result<Self, LeafError> {
        Ok(Self {
            classifier: LeafClassifier::with_models(config, models)?,
        })
    }

    pub fn classifier(&self) -> &LeafClassifier {
        &self.classifier
    }

    /// True once a model is available, loading on first use.
    pub fn is_ready(&self) -> bool {
        self.classifier.models().is_loaded()
    }

    /// Classifies an RGB image.
    ///
    /// # Errors
    ///
    /// * `ModelNotLoaded` when no model is available
    /// * `InvalidInput` when the image has no pixels
    /// * `Inference` when the forward pass fails
    pub fn predict(&self, image: &RgbImage) -> Result<ClassificationResult, LeafError> {
        self.predict_traced(image).0
    }

    /// Classifies an RGB image and assembles the response body.
    ///
    /// Never fails: errors become the failure shape.
    pub fn predict_response(&self, image: &RgbImage) -> PredictResponse {
        self.respond_traced(image).0
    }

    /// Knowledge-base record for `label`.
    pub fn lookup(&self, label: ClassLabel) -> &'static DiseaseRecord {
        knowledge::lookup(label)
    }

    /// Knowledge-base record for a display name; `None` for unknown names.
    pub fn lookup_name(&self, name: &str) -> Option<&'static DiseaseRecord> {
        knowledge::lookup_name(name)
    }

    /// Model metrics for `label`.
    pub fn class_metrics(&self, label: ClassLabel) -> ClassMetrics {
        metrics::class_metrics(label)
    }

    fn predict_traced(
        &self,
        image: &RgbImage,
    ) -> (Result<ClassificationResult, LeafError>, RequestStage) {
        let mut trace = RequestTrace::start();
        let result = self.classify_stages(&mut trace, image);
        if result.is_ok() {
            trace.finish();
        }
        (result, trace.stage)
    }

    fn respond_traced(&self, image: &RgbImage) -> (PredictResponse, RequestStage) {
        let mut trace = RequestTrace::start();
        let response = match self.classify_stages(&mut trace, image) {
            Ok(result) => {
                let assembled = assemble(&result, |label| Some(knowledge::lookup(label)));
                trace.advance();
                trace.finish();
                PredictResponse::Success(assembled)
            }
            Err(err) => PredictResponse::failure(&err),
        };
        (response, trace.stage)
    }

    fn classify_stages(
        &self,
        trace: &mut RequestTrace,
        image: &RgbImage,
    ) -> Result<ClassificationResult, LeafError> {
        if let Err(err) = self.classifier.ensure_model() {
            trace.fail(&err);
            return Err(err);
        }
        let tensor = trace.step(self.classifier.preprocess(image))?;
        trace.step(self.classifier.classify(&tensor))
    }
}

/// The `{kind, message}` pair handed to a delivery layer for `err`.
pub fn error_payload(err: &LeafError) -> (ErrorKind, String) {
    (err.kind(), err.to_string())
}
