//! Caller-side utilities.

pub mod image;

pub use image::{decode_image, dynamic_to_rgb, load_image};
