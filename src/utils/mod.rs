//! Utility functions for the equation pipeline.
//!
//! Image loading and conversion, classifier input tensors, glyph overlay
//! drawing and logging setup.

pub mod image;
pub mod tensor;
pub mod visualization;

pub use image::{dynamic_to_gray, dynamic_to_rgb, load_image};
pub use tensor::{Tensor4D, bitmap_to_tensor, bitmaps_to_batch_tensor};
pub use visualization::draw_glyph_boxes;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
