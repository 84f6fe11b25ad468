//! Image loading and conversion helpers.

use crate::core::errors::{EqResult, EquationError};
use image::{DynamicImage, GrayImage, RgbImage};
use std::path::Path;

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: &DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Converts a DynamicImage to a single-channel intensity image.
pub fn dynamic_to_gray(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Loads an image in any format supported by the image crate.
///
/// # Errors
///
/// Returns [`EquationError::ImageLoad`] if the file cannot be read or decoded,
/// and [`EquationError::InvalidImage`] if it decodes to zero area.
pub fn load_image(path: &Path) -> EqResult<DynamicImage> {
    let img = image::open(path).map_err(EquationError::ImageLoad)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(EquationError::invalid_image(format!(
            "{} has zero area",
            path.display()
        )));
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_load_image_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("page.png");
        let mut img = RgbImage::from_pixel(8, 4, Rgb([255, 255, 255]));
        img.put_pixel(2, 1, Rgb([0, 0, 0]));
        img.save(&path).expect("saved");

        let loaded = load_image(&path).expect("loaded");
        assert_eq!((loaded.width(), loaded.height()), (8, 4));
        let gray = dynamic_to_gray(&loaded);
        assert_eq!(gray.get_pixel(2, 1).0[0], 0);
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_missing_file_is_image_load_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = load_image(&dir.path().join("absent.png"));
        assert!(matches!(result, Err(EquationError::ImageLoad(_))));
    }
}
