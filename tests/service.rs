//! End-to-end tests of the diagnosis service with stand-in models.

use image::{Rgb, RgbImage};
use leafscan::core::{ScoreModel, SimpleError, Tensor4D};
use leafscan::domain::{CLASS_COUNT, Severity, knowledge, metrics};
use leafscan::pipeline::error_payload;
use leafscan::predictor::ModelManager;
use leafscan::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Softmax over per-channel means, so the scores depend on the image.
#[derive(Debug, Default)]
struct ChannelSoftmax {
    calls: AtomicUsize,
}

impl ScoreModel for ChannelSoftmax {
    fn model_name(&self) -> &str {
        "channel-softmax"
    }

    fn scores(&self, input: &Tensor4D) -> Result<Vec<f32>, LeafError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let shape = input.shape();
        if shape != [1, 224, 224, 3] {
            return Err(LeafError::inference_error(
                self.model_name(),
                "input shape",
                SimpleError::new(format!("unexpected shape {shape:?}")),
            ));
        }

        let means: Vec<f32> = (0..3)
            .map(|c| input.slice(ndarray::s![0, .., .., c]).mean().unwrap_or(0.0))
            .collect();
        let logits: Vec<f32> = (0..CLASS_COUNT)
            .map(|i| means[i % 3] * (i as f32 + 1.0))
            .collect();
        let max = logits.iter().cloned().fold(f32::MIN, f32::max);
        let exp: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f32 = exp.iter().sum();
        Ok(exp.into_iter().map(|e| e / total).collect())
    }
}

#[derive(Debug)]
struct Broken;

impl ScoreModel for Broken {
    fn model_name(&self) -> &str {
        "broken"
    }

    fn scores(&self, _input: &Tensor4D) -> Result<Vec<f32>, LeafError> {
        Err(LeafError::inference_error(
            "broken",
            "forward pass",
            SimpleError::new("device lost"),
        ))
    }
}

fn service_with(model: Arc<dyn ScoreModel>) -> DiagnosisService {
    DiagnosisService::with_model_manager(&ServiceConfig::default(), ModelManager::with_model(model))
        .unwrap()
}

fn uniform_leaf() -> RgbImage {
    RgbImage::from_pixel(224, 224, Rgb([90, 140, 70]))
}

#[test]
fn test_uniform_image_yields_success_shape() {
    let service = service_with(Arc::new(ChannelSoftmax::default()));
    let response = service.predict_response(&uniform_leaf());
    assert!(response.is_success());

    let value: Value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["success"], Value::Bool(true));

    let class = value["prediction"]["class"].as_str().unwrap();
    assert!(class.parse::<ClassLabel>().is_ok(), "unknown class {class}");
    assert!(value["prediction"]["confidence"].is_f64());

    let info = value["prediction"]["disease_info"].as_object().unwrap();
    for key in ["scientific_name", "type", "category", "symptoms", "interventions", "severity"] {
        assert!(info[key].is_string(), "disease_info.{key} should be a string");
    }

    let entries = value["all_predictions"].as_array().unwrap();
    assert!(!entries.is_empty() && entries.len() <= CLASS_COUNT);
    let predicted: Vec<&Value> = entries
        .iter()
        .filter(|e| e["is_predicted"] == Value::Bool(true))
        .collect();
    assert_eq!(predicted.len(), 1);
    assert_eq!(predicted[0]["disease"].as_str(), Some(class));
    for entry in entries {
        assert!(entry["disease"].is_string());
        assert!(entry["confidence"].as_f64().unwrap() > 0.01);
        assert!(entry["is_predicted"].is_boolean());
    }
}

#[test]
fn test_result_invariants_hold_for_varied_images() {
    let service = service_with(Arc::new(ChannelSoftmax::default()));
    let images = [
        RgbImage::from_pixel(224, 224, Rgb([255, 0, 0])),
        RgbImage::from_pixel(640, 480, Rgb([10, 200, 30])),
        RgbImage::from_fn(300, 300, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128])),
        RgbImage::from_pixel(1, 1, Rgb([0, 0, 255])),
    ];

    for image in &images {
        let result = service.predict(image).unwrap();
        let flagged: Vec<_> = result.all_predictions.iter().filter(|e| e.is_predicted).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].disease, result.predicted_class);
        assert_eq!(flagged[0].confidence, result.confidence);
        for pair in result.all_predictions.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
        for entry in &result.all_predictions {
            assert!(entry.is_predicted || entry.confidence > 0.01);
        }
    }
}

#[test]
fn test_predict_is_deterministic() {
    let model = Arc::new(ChannelSoftmax::default());
    let service = service_with(model.clone());
    let image = RgbImage::from_fn(500, 375, |x, y| Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 50]));

    let first = service.predict(&image).unwrap();
    let second = service.predict(&image).unwrap();
    assert_eq!(first, second);
    assert_eq!(model.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_not_loaded_model_returns_failure_without_panicking() {
    let service = DiagnosisService::with_model_manager(
        &ServiceConfig::default(),
        ModelManager::not_loaded("models/tomato_disease.onnx not found"),
    )
    .unwrap();

    let response = service.predict_response(&uniform_leaf());
    let value: Value = serde_json::to_value(&response).unwrap();
    assert_eq!(value, serde_json::json!({"success": false, "error": "model not loaded"}));

    let err = service.predict(&uniform_leaf()).unwrap_err();
    assert_eq!(error_payload(&err), (ErrorKind::ModelNotLoaded, "model not loaded".to_string()));
}

#[test]
fn test_missing_model_files_leave_service_usable() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServiceConfig::with_model_path(dir.path().join("tomato_disease.onnx"))
        .fallback_model_path(dir.path().join("best_mobilenet_finetuned.onnx"));

    let service = DiagnosisService::new(&config).unwrap();
    assert!(!service.is_ready());
    assert!(!service.predict_response(&uniform_leaf()).is_success());
    // Knowledge lookups do not depend on the model.
    assert_eq!(service.lookup(ClassLabel::LateBlight).severity, Severity::VeryHigh);
}

#[test]
fn test_forward_pass_failure_is_reported_with_cause() {
    let service = service_with(Arc::new(Broken));
    let err = service.predict(&uniform_leaf()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InferenceError);
    assert_eq!(
        std::error::Error::source(&err).map(|s| s.to_string()),
        Some("device lost".to_string())
    );

    let value = serde_json::to_value(service.predict_response(&uniform_leaf())).unwrap();
    assert_eq!(value["success"], Value::Bool(false));
    assert!(value["error"].as_str().unwrap().contains("broken"));
}

#[test]
fn test_empty_image_is_invalid_input() {
    let service = service_with(Arc::new(ChannelSoftmax::default()));
    let err = service.predict(&RgbImage::new(0, 10)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_knowledge_base_is_total() {
    for label in ClassLabel::ALL {
        let record = knowledge::lookup(label);
        assert_eq!(record.label, label);
        assert!(!record.symptoms.is_empty());
        assert!(matches!(
            record.severity,
            Severity::None | Severity::Medium | Severity::High | Severity::VeryHigh
        ));
        assert_eq!(knowledge::lookup_name(label.name()), Some(record));
    }
    assert!(knowledge::lookup_name("Powdery Mildew").is_none());
}

#[test]
fn test_concurrent_predictions_share_one_model() {
    let model = Arc::new(ChannelSoftmax::default());
    let service = Arc::new(service_with(model.clone()));
    let expected = service.predict(&uniform_leaf()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || service.predict(&uniform_leaf()).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    assert_eq!(model.calls.load(Ordering::SeqCst), 5);
}

#[test]
fn test_metrics_cover_every_label() {
    let service = service_with(Arc::new(ChannelSoftmax::default()));
    for label in ClassLabel::ALL {
        let entry = service.class_metrics(label);
        assert_eq!(entry.label, label);
        assert!(entry.f1_score > 0.0 && entry.f1_score <= 1.0);
    }

    let value = serde_json::to_value(metrics::class_metrics(ClassLabel::Healthy)).unwrap();
    assert_eq!(value["label"], Value::String("Healthy Plant".into()));
    assert!(value["precision"].is_f64());
    assert_eq!(metrics::OVERALL.test_images, 2189);
}
