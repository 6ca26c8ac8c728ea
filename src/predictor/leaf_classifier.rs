//! Leaf disease classifier.
//!
//! Combines the preprocessing stage, the shared model handle and the ranker.
//! Each stage is a separate method so the request pipeline can track them;
//! the classifier holds no per-request state and one instance serves any
//! number of threads.

use crate::core::config::{ConfigValidatorExt, ServiceConfig};
use crate::core::{LeafError, ScoreModel, Tensor4D};
use crate::domain::{ClassificationResult, LabelOrder};
use crate::predictor::model_manager::ModelManager;
use crate::processors::{Preprocessor, Ranker};
use image::RgbImage;
use std::sync::Arc;
use tracing::warn;

/// Allowed distance of the score sum from 1 before a warning is logged.
const SCORE_SUM_TOLERANCE: f32 = 1e-3;

/// Image classifier for tomato leaf diseases.
#[derive(Debug)]
pub struct LeafClassifier {
    preprocessor: Preprocessor,
    ranker: Ranker,
    models: ModelManager,
}

impl LeafClassifier {
    /// Creates a classifier from its parts.
    pub fn new(preprocessor: Preprocessor, ranker: Ranker, models: ModelManager) -> Self {
        Self {
            preprocessor,
            ranker,
            models,
        }
    }

    /// Creates a classifier for `config`, loading the model now if
    /// `config.eager_load` is set.
    ///
    /// A model that fails to load does not fail construction; it leaves the
    /// classifier in the not-loaded state.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, LeafError> {
        Self::with_models(config, ModelManager::from_config(config))
    }

    /// Creates a classifier for `config` around an existing model manager.
    pub fn with_models(config: &ServiceConfig, models: ModelManager) -> Result<Self, LeafError> {
        config.validate_and_wrap()?;
        let classifier = Self::new(
            Preprocessor::new(config.input_shape),
            Ranker::new(LabelOrder::V1, config.confidence_floor),
            models,
        );
        if config.eager_load {
            classifier.models.get_or_load();
        }
        Ok(classifier)
    }

    /// The model manager backing this classifier.
    pub fn models(&self) -> &ModelManager {
        &self.models
    }

    /// Returns the loaded model, loading it on first use.
    ///
    /// Callers check this before spending time on preprocessing.
    pub fn ensure_model(&self) -> Result<Arc<dyn ScoreModel>, LeafError> {
        self.models.model()
    }

    /// Converts an RGB image to the classifier input tensor.
    pub fn preprocess(&self, image: &RgbImage) -> Result<Tensor4D, LeafError> {
        self.preprocessor.to_tensor(image)
    }

    /// Runs one forward pass on a preprocessed tensor and ranks the scores.
    ///
    /// # Errors
    ///
    /// * `ModelNotLoaded` if no model is available
    /// * `Inference` if the forward pass or score validation fails
    pub fn classify(&self, tensor: &Tensor4D) -> Result<ClassificationResult, LeafError> {
        let model = self.ensure_model()?;
        let scores = model.scores(tensor)?;

        let sum: f32 = scores.iter().sum();
        if (sum - 1.0).abs() > SCORE_SUM_TOLERANCE {
            warn!(
                model = model.model_name(),
                sum, "classifier scores do not sum to 1; reporting them unnormalized"
            );
        }

        self.ranker.rank(&scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ErrorKind, SimpleError};
    use crate::domain::ClassLabel;
    use image::Rgb;

    #[derive(Debug)]
    struct FixedScores(Vec<f32>);

    impl ScoreModel for FixedScores {
        fn model_name(&self) -> &str {
            "fixed"
        }

        fn scores(&self, input: &Tensor4D) -> Result<Vec<f32>, LeafError> {
            assert_eq!(input.shape(), &[1, 224, 224, 3]);
            Ok(self.0.clone())
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl ScoreModel for Failing {
        fn model_name(&self) -> &str {
            "failing"
        }

        fn scores(&self, _input: &Tensor4D) -> Result<Vec<f32>, LeafError> {
            Err(LeafError::inference_error(
                "failing",
                "forward pass",
                SimpleError::new("out of memory"),
            ))
        }
    }

    fn classifier(model: impl ScoreModel + 'static) -> LeafClassifier {
        LeafClassifier::with_models(
            &ServiceConfig::default(),
            ModelManager::with_model(Arc::new(model)),
        )
        .unwrap()
    }

    fn leaf() -> RgbImage {
        RgbImage::from_pixel(224, 224, Rgb([40, 160, 60]))
    }

    fn run_stages(
        classifier: &LeafClassifier,
        image: &RgbImage,
    ) -> Result<ClassificationResult, LeafError> {
        classifier.ensure_model()?;
        let tensor = classifier.preprocess(image)?;
        classifier.classify(&tensor)
    }

    #[test]
    fn test_stages_rank_model_scores() {
        let mut scores = vec![0.005; 10];
        scores[9] = 0.955;
        let result = run_stages(&classifier(FixedScores(scores)), &leaf()).unwrap();

        assert_eq!(result.predicted_class, ClassLabel::Healthy);
        assert_eq!(result.confidence, 0.955);
        assert_eq!(result.all_predictions.len(), 1);
        assert!(result.is_healthy());
    }

    #[test]
    fn test_not_loaded_model_is_reported() {
        let classifier = LeafClassifier::with_models(
            &ServiceConfig::default(),
            ModelManager::not_loaded("missing"),
        )
        .unwrap();
        let err = classifier.ensure_model().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelNotLoaded);
        assert_eq!(err.to_string(), "model not loaded");

        let err = classifier
            .classify(&Tensor4D::zeros((1, 224, 224, 3)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelNotLoaded);
    }

    #[test]
    fn test_forward_pass_failure_keeps_cause() {
        let err = run_stages(&classifier(Failing), &leaf()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InferenceError);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "out of memory");
    }

    #[test]
    fn test_wrong_output_width_is_inference_error() {
        let err = run_stages(&classifier(FixedScores(vec![0.5, 0.5])), &leaf()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InferenceError);
    }

    #[test]
    fn test_invalid_image_is_invalid_input() {
        let err = classifier(FixedScores(vec![0.1; 10]))
            .preprocess(&RgbImage::new(0, 0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ServiceConfig::default().confidence_floor(2.0);
        let err = LeafClassifier::with_models(&config, ModelManager::not_loaded("x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
