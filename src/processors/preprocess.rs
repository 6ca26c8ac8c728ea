//! Image preprocessing for the leaf classifier.
//!
//! An RGB image is resized to the classifier input size with a fixed
//! bicubic filter and scaled to `[0, 1]`, producing an NHWC tensor with a
//! batch dimension of one. No cropping, flipping or mean/std normalization
//! is applied; the classifier was trained on plain `pixel / 255` inputs.

use crate::core::config::DEFAULT_INPUT_SHAPE;
use crate::core::{LeafError, Tensor4D};
use image::{DynamicImage, RgbImage, imageops::FilterType};

/// Resampling filter used for every resize. Changing it changes every tensor
/// the classifier sees.
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Converts decoded images into classifier input tensors.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    /// Input shape (height, width)
    input_shape: (u32, u32),
    /// Scaling factor applied to each channel value
    scale: f32,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SHAPE)
    }
}

impl Preprocessor {
    /// Creates a preprocessor producing `[1, height, width, 3]` tensors.
    pub fn new(input_shape: (u32, u32)) -> Self {
        Self {
            input_shape,
            scale: 1.0 / 255.0,
        }
    }

    /// Input shape (height, width).
    pub fn input_shape(&self) -> (u32, u32) {
        self.input_shape
    }

    /// Resizes `image` and scales it into a `[1, H, W, 3]` tensor in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the image has no pixels.
    pub fn to_tensor(&self, image: &RgbImage) -> Result<Tensor4D, LeafError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(LeafError::invalid_input(format!(
                "image must be at least 1x1 pixels, got {width}x{height}"
            )));
        }

        let (target_h, target_w) = self.input_shape;
        let resized = image::imageops::resize(image, target_w, target_h, RESIZE_FILTER);

        let data: Vec<f32> = resized
            .into_raw()
            .into_iter()
            .map(|v| v as f32 * self.scale)
            .collect();
        let tensor =
            Tensor4D::from_shape_vec((1, target_h as usize, target_w as usize, 3), data)?;
        Ok(tensor)
    }

    /// Like [`to_tensor`](Self::to_tensor) for a `DynamicImage`.
    ///
    /// The image must already be a 3-channel colour image without alpha;
    /// converting other modes is the caller's job.
    pub fn to_tensor_dynamic(&self, image: &DynamicImage) -> Result<Tensor4D, LeafError> {
        let color = image.color();
        if color.channel_count() != 3 || color.has_alpha() {
            return Err(LeafError::invalid_input(format!(
                "expected a 3-channel RGB image, got {color:?}"
            )));
        }
        match image.as_rgb8() {
            Some(rgb) => self.to_tensor(rgb),
            None => self.to_tensor(&image.to_rgb8()),
        }
    }
}

/// Converts `image` with the default 224x224 preprocessor.
pub fn to_tensor(image: &RgbImage) -> Result<Tensor4D, LeafError> {
    Preprocessor::default().to_tensor(image)
}
