//! Image preprocessing: grayscale conversion, Otsu binarization and closing.
//!
//! The [`Preprocessor`] turns an arbitrary raster image into a [`BinaryMask`]
//! where ink is foreground. It is a pure transform; the same input always
//! yields the same mask.

use image::{DynamicImage, GrayImage};
use imageproc::contrast::otsu_level;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::{BACKGROUND, DEFAULT_CLOSING_KERNEL, INK};
use crate::core::errors::{EqResult, EquationError};
use crate::domain::BinaryMask;
use crate::processors::morphology::close_square;

/// Configuration for the preprocessing stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Side length of the square closing element. `0` or `1` disables closing.
    pub closing_kernel: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            closing_kernel: DEFAULT_CLOSING_KERNEL,
        }
    }
}

impl ConfigValidator for PreprocessConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_size_range(self.closing_kernel, 0, 15, "closing_kernel")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Everything the preprocessor computed for one image.
#[derive(Debug, Clone)]
pub struct PreprocessOutput {
    /// Single-channel intensity image.
    pub gray: GrayImage,
    /// Intensity level chosen by Otsu's method; pixels at or below it are ink.
    pub threshold: u8,
    /// Inverted, closed binary mask.
    pub mask: BinaryMask,
}

/// Converts raw images into binary ink masks.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Binarizes `image` into an ink mask.
    ///
    /// # Errors
    ///
    /// Returns [`EquationError::InvalidImage`] if the image has zero area.
    pub fn binarize(&self, image: &DynamicImage) -> EqResult<BinaryMask> {
        Ok(self.process(image)?.mask)
    }

    /// Binarizes `image` and keeps the intermediate grayscale image.
    pub fn process(&self, image: &DynamicImage) -> EqResult<PreprocessOutput> {
        if image.width() == 0 || image.height() == 0 {
            return Err(EquationError::invalid_image(format!(
                "image has zero area ({}x{})",
                image.width(),
                image.height()
            )));
        }
        self.process_gray(image.to_luma8())
    }

    /// Binarizes an image that is already single-channel.
    pub fn process_gray(&self, gray: GrayImage) -> EqResult<PreprocessOutput> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(EquationError::invalid_image(format!(
                "image has zero area ({width}x{height})"
            )));
        }

        let threshold = otsu_level(&gray);
        let mut inverted = GrayImage::new(width, height);
        for (src, dst) in gray.pixels().zip(inverted.pixels_mut()) {
            dst.0[0] = if src.0[0] <= threshold { INK } else { BACKGROUND };
        }

        let closed = close_square(&inverted, self.config.closing_kernel);
        let mask = BinaryMask::from_binary_unchecked(closed);

        debug!(
            "Binarized {}x{} image at Otsu level {}, {} ink pixels",
            width,
            height,
            threshold,
            mask.ink_count()
        );

        Ok(PreprocessOutput {
            gray,
            threshold,
            mask,
        })
    }
}
