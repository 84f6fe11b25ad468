//! Morphological closing on binary masks.
//!
//! Odd kernel sizes delegate to `imageproc::morphology::close` (a `k x k`
//! square is an L∞ ball of radius `k / 2`). Even sizes have no centred
//! anchor, so they dilate with a square [`Mask`] anchored at `k / 2` and erode
//! with its reflection; the closing therefore never shifts strokes.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{self, Mask};

/// Largest even kernel whose anchor still fits a `Mask` centre.
const MAX_EVEN_KERNEL: u32 = 254;

/// Applies dilate-then-erode with a `kernel x kernel` square structuring element.
///
/// `kernel <= 1` returns a copy of the input.
pub fn close_square(image: &GrayImage, kernel: u32) -> GrayImage {
    if kernel <= 1 {
        return image.clone();
    }
    if kernel % 2 == 1 {
        let radius = u8::try_from(kernel / 2).unwrap_or(u8::MAX);
        return morphology::close(image, Norm::LInf, radius);
    }

    let kernel = kernel.min(MAX_EVEN_KERNEL);
    let anchor = kernel / 2;
    let dilation = square_mask(kernel, anchor);
    let erosion = square_mask(kernel, kernel - 1 - anchor);

    let dilated = morphology::grayscale_dilate(image, &dilation);
    morphology::grayscale_erode(&dilated, &erosion)
}

/// A filled `size x size` element with its centre at (`anchor`, `anchor`).
fn square_mask(size: u32, anchor: u32) -> Mask {
    let element = GrayImage::from_pixel(size, size, Luma([255]));
    let anchor = u8::try_from(anchor).unwrap_or(u8::MAX);
    Mask::from_image(&element, anchor, anchor)
}
