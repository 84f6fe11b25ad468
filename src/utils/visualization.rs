//! Glyph overlay drawing.
//!
//! Replaces on-disk debug dumps: the overlay is returned as an image and the
//! caller decides whether to save it.

use crate::domain::{BoundingRect, GlyphRegion};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::debug;

const BBOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

const BBOX_THICKNESS: u32 = 2;

/// Draws the bounding box of every glyph on a copy of `image`.
pub fn draw_glyph_boxes(image: &DynamicImage, glyphs: &[GlyphRegion]) -> RgbImage {
    let mut overlay = image.to_rgb8();
    for glyph in glyphs {
        draw_bounding_box(&mut overlay, &glyph.bounding_box);
    }
    debug!("Drew {} glyph boxes", glyphs.len());
    overlay
}

/// Draws `bbox` with its outline growing inward, so boxes touching the image
/// edge stay visible.
fn draw_bounding_box(img: &mut RgbImage, bbox: &BoundingRect) {
    for inset in 0..BBOX_THICKNESS {
        if bbox.width <= 2 * inset || bbox.height <= 2 * inset {
            break;
        }
        let rect = Rect::at((bbox.x + inset) as i32, (bbox.y + inset) as i32)
            .of_size(bbox.width - 2 * inset, bbox.height - 2 * inset);
        draw_hollow_rect_mut(img, rect, BBOX_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_outline_is_two_pixels() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([255, 255, 255])));
        let mut overlay = image.to_rgb8();
        draw_bounding_box(&mut overlay, &BoundingRect::new(2, 2, 10, 10));
        assert_eq!(*overlay.get_pixel(2, 2), BBOX_COLOR);
        assert_eq!(*overlay.get_pixel(3, 6), BBOX_COLOR);
        assert_eq!(*overlay.get_pixel(11, 11), BBOX_COLOR);
        assert_eq!(*overlay.get_pixel(4, 6), Rgb([255, 255, 255]));
        assert_eq!(*overlay.get_pixel(15, 15), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_thin_box_does_not_underflow() {
        let mut overlay = RgbImage::new(10, 10);
        draw_bounding_box(&mut overlay, &BoundingRect::new(0, 4, 10, 1));
        assert_eq!(*overlay.get_pixel(5, 4), BBOX_COLOR);
    }
}
