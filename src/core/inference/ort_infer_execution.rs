use super::*;
use crate::core::errors::SimpleError;
use ndarray::ArrayView2;
use ort::value::TensorRef;

impl OrtInfer {
    fn run_inference_with_processor<T>(
        &self,
        x: &Tensor4D,
        processor: impl FnOnce(&[i64], &[f32]) -> Result<T, LeafError>,
    ) -> Result<T, LeafError> {
        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            LeafError::inference_error(
                &self.model_name,
                &format!("failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self
            .next_idx
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            % self.sessions.len();
        let mut session_guard = lock_session(&self.sessions[idx], &self.model_name, idx);

        let outputs = session_guard.run(inputs).map_err(|e| {
            LeafError::inference_error(
                &self.model_name,
                &format!(
                    "ONNX Runtime forward pass failed with input '{}' -> output '{}' (shape {:?})",
                    self.input_name, self.output_name, input_shape
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                LeafError::inference_error(
                    &self.model_name,
                    &format!("failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;

        processor(output_shape, output_data)
    }

    /// Runs the model and returns its `(batch, classes)` score matrix.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, LeafError> {
        let batch_size = x.shape()[0];
        let input_shape = x.shape().to_vec();
        self.run_inference_with_processor(x, |output_shape, output_data| {
            if output_shape.len() != 2 {
                return Err(LeafError::inference_error(
                    &self.model_name,
                    &format!(
                        "expected 2D output tensor, got {}D with shape {:?}",
                        output_shape.len(),
                        output_shape
                    ),
                    SimpleError::new("invalid output tensor dimensions"),
                ));
            }

            let num_classes = output_shape[1] as usize;
            let expected_len = batch_size * num_classes;

            if output_data.len() != expected_len {
                return Err(LeafError::inference_error(
                    &self.model_name,
                    &format!(
                        "output data size mismatch for input shape {:?} -> output shape {:?}: expected {}, got {}",
                        input_shape,
                        output_shape,
                        expected_len,
                        output_data.len()
                    ),
                    SimpleError::new("output tensor data size mismatch"),
                ));
            }

            let array_view = ArrayView2::from_shape((batch_size, num_classes), output_data)?;
            Ok(array_view.to_owned())
        })
    }
}
