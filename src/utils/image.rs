//! Image loading helpers for callers of the service.
//!
//! The core expects decoded RGB images. These helpers decode bytes or files
//! and convert whatever colour type they hold to 8-bit RGB.

use crate::core::LeafError;
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Converts a DynamicImage to an RgbImage, dropping alpha and expanding
/// grayscale.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Decodes an in-memory image (format guessed from its header) to RGB.
///
/// # Errors
///
/// `LeafError::ImageLoad` when the bytes are not a supported image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, LeafError> {
    let img = image::load_from_memory(bytes).map_err(LeafError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Loads an image file and converts it to RGB.
///
/// # Errors
///
/// `LeafError::ImageLoad` when the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> Result<RgbImage, LeafError> {
    let img = image::open(path).map_err(LeafError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}
