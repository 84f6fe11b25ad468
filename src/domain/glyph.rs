//! Glyph regions and the canonical bitmaps handed to the classifier.

use crate::core::constants::INK;
use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel coordinates.
///
/// `x`/`y` are the top-left corner; `width`/`height` are inclusive pixel
/// counts, so a single pixel has a `1x1` rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingRect {
    #[inline]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle covering all points. Returns `None` for no points.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut iter = points.into_iter();
        let (x0, y0) = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for (x, y) in iter {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Grows the rectangle by `padding` on every side, clamped to `bounds` (width, height).
    pub fn padded(&self, padding: u32, bounds: (u32, u32)) -> Self {
        let (bound_w, bound_h) = bounds;
        let x1 = self.x.saturating_sub(padding);
        let y1 = self.y.saturating_sub(padding);
        let x2 = self.right().saturating_add(padding).min(bound_w);
        let y2 = self.bottom().saturating_add(padding).min(bound_h);
        Self::new(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1))
    }
}

/// The fixed-size square bitmap a glyph is normalized to before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalBitmap {
    image: GrayImage,
}

impl CanonicalBitmap {
    /// Wraps a square grayscale image. Returns `None` if it is not square or empty.
    pub fn new(image: GrayImage) -> Option<Self> {
        let (w, h) = image.dimensions();
        (w == h && w > 0).then_some(Self { image })
    }

    /// An all-background bitmap of the given side length.
    pub fn blank(size: u32) -> Self {
        Self {
            image: GrayImage::from_pixel(size, size, Luma([0])),
        }
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }

    /// Mean intensity normalized to `0.0..=1.0`.
    pub fn ink_density(&self) -> f32 {
        let total: u64 = self.image.pixels().map(|p| p.0[0] as u64).sum();
        let n = self.image.width() as u64 * self.image.height() as u64;
        if n == 0 {
            return 0.0;
        }
        total as f32 / (n as f32 * INK as f32)
    }

    /// Bounding rectangle of pixels at or above `threshold`.
    pub fn ink_extent(&self, threshold: u8) -> Option<BoundingRect> {
        BoundingRect::enclosing(
            self.image
                .enumerate_pixels()
                .filter(|(_, _, p)| p.0[0] >= threshold)
                .map(|(x, y, _)| (x, y)),
        )
    }
}

/// One detected connected component.
#[derive(Debug, Clone)]
pub struct GlyphRegion {
    /// Index after left-to-right sorting.
    pub ordinal: usize,
    /// Unpadded bounding box of the component's outer contour.
    pub bounding_box: BoundingRect,
    /// Bounding box after padding and clamping; the region `patch` was cropped from.
    pub crop_box: BoundingRect,
    /// Area enclosed by the outer contour, in px².
    pub contour_area: f64,
    /// Raw crop from the binary mask.
    pub patch: GrayImage,
    /// Square-padded, resized bitmap for the classifier.
    pub bitmap: CanonicalBitmap,
}
