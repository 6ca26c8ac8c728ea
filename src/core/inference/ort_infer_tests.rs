use super::*;
use crate::core::config::OrtSessionConfig;
use crate::core::errors::ErrorKind;
use std::io::Write;

#[test]
fn test_missing_model_is_model_not_loaded() {
    let err = OrtInfer::new("dummy_path.onnx", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModelNotLoaded);
    assert!(matches!(err, LeafError::ModelNotLoaded { ref reason } if reason.contains("dummy_path.onnx")));
}

#[test]
fn test_with_pool_respects_config_and_fails_on_missing_file() {
    let config = OrtSessionConfig::new().with_intra_threads(2);
    let result = OrtInfer::with_pool("dummy_path.onnx", None, 3, Some(&config));
    assert!(result.is_err());
}

#[test]
fn test_corrupt_model_is_model_not_loaded() {
    let mut file = tempfile::Builder::new().suffix(".onnx").tempfile().unwrap();
    file.write_all(b"definitely not a protobuf").unwrap();

    let err = OrtInfer::new(file.path(), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModelNotLoaded);
}

#[test]
fn test_declared_input_shape_matching() {
    assert!(declared_shape_accepts(&[1, 224, 224, 3], (224, 224)));
    assert!(declared_shape_accepts(&[-1, 224, 224, 3], (224, 224)));
    assert!(declared_shape_accepts(&[-1, -1, -1, 3], (300, 200)));

    // NCHW export of the same network.
    assert!(!declared_shape_accepts(&[1, 3, 224, 224], (224, 224)));
    assert!(!declared_shape_accepts(&[1, 256, 256, 3], (224, 224)));
    assert!(!declared_shape_accepts(&[1, 224, 224], (224, 224)));
}

#[test]
fn test_poisoned_session_lock_recovers() {
    let session = std::sync::Arc::new(Mutex::new(7_u32));
    let holder = std::sync::Arc::clone(&session);
    let _ = std::thread::spawn(move || {
        let _guard = holder.lock().unwrap();
        panic!("forward pass panicked");
    })
    .join();
    assert!(session.is_poisoned());

    assert_eq!(*lock_session(&session, "mobilenet", 0), 7);
    assert!(!session.is_poisoned());
    *lock_session(&session, "mobilenet", 0) += 1;
    assert_eq!(*session.lock().unwrap(), 8);
}
