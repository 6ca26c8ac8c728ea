//! Image and score processing.
//!
//! # Modules
//!
//! * `preprocess` - Decoded image to classifier input tensor
//! * `ranking` - Raw classifier scores to a ranked classification result

pub mod preprocess;
pub mod ranking;

pub use preprocess::{Preprocessor, RESIZE_FILTER, to_tensor};
pub use ranking::{Ranker, rank_scores};
