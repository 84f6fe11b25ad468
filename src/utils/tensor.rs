//! Classifier input tensors.
//!
//! Canonical bitmaps are single-channel; classifiers trained on RGB input
//! receive the channel replicated three times in `(N, H, W, C)` layout.
//! Values stay in `0..=255`; rescaling belongs to the model.

use crate::core::errors::{EqResult, EquationError};
use crate::domain::CanonicalBitmap;
use ndarray::{Array4, Axis};

/// A 4-dimensional `(batch, height, width, channel)` tensor.
pub type Tensor4D = Array4<f32>;

const CHANNELS: usize = 3;

/// Converts one bitmap into a `(1, S, S, 3)` tensor.
pub fn bitmap_to_tensor(bitmap: &CanonicalBitmap) -> Tensor4D {
    let size = bitmap.size() as usize;
    let image = bitmap.as_image();
    Array4::from_shape_fn((1, size, size, CHANNELS), |(_, y, x, _)| {
        image.get_pixel(x as u32, y as u32).0[0] as f32
    })
}

/// Stacks bitmaps into a `(N, S, S, 3)` tensor.
///
/// # Errors
///
/// Returns [`EquationError::InvalidInput`] if the batch is empty or the
/// bitmaps differ in size.
pub fn bitmaps_to_batch_tensor(bitmaps: &[&CanonicalBitmap]) -> EqResult<Tensor4D> {
    let Some(first) = bitmaps.first() else {
        return Err(EquationError::invalid_input("empty bitmap batch"));
    };
    let size = first.size();
    if let Some(odd) = bitmaps.iter().find(|b| b.size() != size) {
        return Err(EquationError::invalid_input(format!(
            "bitmap batch mixes sizes {} and {}",
            size,
            odd.size()
        )));
    }

    let side = size as usize;
    let mut batch = Array4::<f32>::zeros((bitmaps.len(), side, side, CHANNELS));
    for (mut slot, bitmap) in batch.axis_iter_mut(Axis(0)).zip(bitmaps) {
        for (x, y, pixel) in bitmap.as_image().enumerate_pixels() {
            let value = pixel.0[0] as f32;
            for c in 0..CHANNELS {
                slot[[y as usize, x as usize, c]] = value;
            }
        }
    }
    Ok(batch)
}
