//! Square padding and area-averaging resize for glyph normalization.

use image::{GrayImage, Luma, imageops};

/// Pads `image` with `fill` so it becomes square.
///
/// The surplus is split evenly between the two short sides; when it is odd
/// the extra row or column goes to the bottom or right. Square inputs are
/// returned unchanged.
pub fn pad_to_square(image: &GrayImage, fill: u8) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == height {
        return image.clone();
    }
    let side = width.max(height);
    let offset_x = (side - width) / 2;
    let offset_y = (side - height) / 2;

    let mut canvas = GrayImage::from_pixel(side, side, Luma([fill]));
    imageops::replace(&mut canvas, image, offset_x as i64, offset_y as i64);
    canvas
}

/// Source pixel weights for one destination index along an axis.
fn axis_weights(src_len: u32, dst_len: u32) -> Vec<Vec<(u32, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = start + scale;
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let overlap = (end.min(s as f64 + 1.0) - start.max(s as f64)).max(0.0);
                    (overlap > 1e-12).then_some((s, overlap))
                })
                .collect()
        })
        .collect()
}

/// Resizes by averaging every source pixel the destination pixel covers,
/// weighted by the covered fraction.
///
/// Downscaling preserves mean intensity, so stroke density survives the
/// resize. An empty source or destination produces an empty image of the
/// destination size.
pub fn resize_area(image: &GrayImage, dst_width: u32, dst_height: u32) -> GrayImage {
    let (src_width, src_height) = image.dimensions();
    let mut out = GrayImage::new(dst_width, dst_height);
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return out;
    }
    if (src_width, src_height) == (dst_width, dst_height) {
        return image.clone();
    }

    let columns = axis_weights(src_width, dst_width);
    let rows = axis_weights(src_height, dst_height);

    for (dy, row_weights) in rows.iter().enumerate() {
        for (dx, col_weights) in columns.iter().enumerate() {
            let mut acc = 0.0;
            let mut total = 0.0;
            for &(sy, wy) in row_weights {
                for &(sx, wx) in col_weights {
                    let w = wx * wy;
                    acc += image.get_pixel(sx, sy).0[0] as f64 * w;
                    total += w;
                }
            }
            let value = if total > 0.0 { acc / total } else { 0.0 };
            out.put_pixel(
                dx as u32,
                dy as u32,
                Luma([value.round().clamp(0.0, 255.0) as u8]),
            );
        }
    }
    out
}
