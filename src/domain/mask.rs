//! The binary ink mask produced by preprocessing.

use crate::core::constants::{BACKGROUND, INK};
use crate::domain::glyph::BoundingRect;
use image::{GrayImage, Luma};
use std::sync::Arc;

/// A 2D grid of binary pixels with ink as foreground.
///
/// Pixels are stored as `0` (background) or `255` (ink) so the mask can be
/// handed directly to `imageproc` routines. The buffer is shared behind an
/// [`Arc`] and never mutated after construction; every region extraction
/// copies out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    image: Arc<GrayImage>,
}

impl BinaryMask {
    /// Builds a mask from any grayscale image, treating every non-zero pixel as ink.
    pub fn from_image(image: &GrayImage) -> Self {
        let mut normalized = image.clone();
        for pixel in normalized.pixels_mut() {
            pixel.0[0] = if pixel.0[0] > 0 { INK } else { BACKGROUND };
        }
        Self {
            image: Arc::new(normalized),
        }
    }

    /// Wraps a buffer that already holds only `0`/`255` values.
    pub(crate) fn from_binary_unchecked(image: GrayImage) -> Self {
        debug_assert!(image.pixels().all(|p| p.0[0] == INK || p.0[0] == BACKGROUND));
        Self {
            image: Arc::new(image),
        }
    }

    /// Creates an all-background mask.
    pub fn empty(width: u32, height: u32) -> Self {
        Self::from_binary_unchecked(GrayImage::from_pixel(width, height, Luma([BACKGROUND])))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Whether the pixel at `(x, y)` is ink. Out-of-bounds pixels are background.
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height() && self.image.get_pixel(x, y).0[0] == INK
    }

    /// Number of ink pixels.
    pub fn ink_count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] == INK).count()
    }

    /// Borrow the underlying `0`/`255` buffer.
    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    /// Renders the mask as a document: dark ink on a white page.
    ///
    /// Feeding the result back through the preprocessor reproduces this mask.
    pub fn to_document_image(&self) -> GrayImage {
        let mut page = (*self.image).clone();
        for pixel in page.pixels_mut() {
            pixel.0[0] = 255 - pixel.0[0];
        }
        page
    }

    /// Copies the pixels inside `rect` into a new buffer.
    ///
    /// `rect` must lie inside the mask; callers clamp it beforehand.
    pub fn crop(&self, rect: &BoundingRect) -> GrayImage {
        image::imageops::crop_imm(&*self.image, rect.x, rect.y, rect.width, rect.height).to_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_image_normalizes_values() {
        let mut img = GrayImage::new(3, 1);
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(1, 0, Luma([17]));
        img.put_pixel(2, 0, Luma([255]));
        let mask = BinaryMask::from_image(&img);
        assert!(!mask.is_ink(0, 0));
        assert!(mask.is_ink(1, 0));
        assert!(mask.is_ink(2, 0));
        assert_eq!(mask.ink_count(), 2);
    }

    #[test]
    fn test_out_of_bounds_is_background() {
        let mask = BinaryMask::empty(4, 4);
        assert!(!mask.is_ink(10, 10));
    }

    #[test]
    fn test_crop_copies_without_touching_mask() {
        let mut img = GrayImage::new(10, 10);
        img.put_pixel(5, 5, Luma([255]));
        let mask = BinaryMask::from_image(&img);
        let mut patch = mask.crop(&BoundingRect::new(4, 4, 3, 3));
        assert_eq!(patch.dimensions(), (3, 3));
        assert_eq!(patch.get_pixel(1, 1).0[0], 255);
        patch.put_pixel(0, 0, Luma([255]));
        assert!(!mask.is_ink(4, 4));
    }

    #[test]
    fn test_document_image_inverts() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(1, 0, Luma([255]));
        let page = BinaryMask::from_image(&img).to_document_image();
        assert_eq!(page.get_pixel(0, 0).0[0], 255);
        assert_eq!(page.get_pixel(1, 0).0[0], 0);
    }
}
