//! Feature-based fallback classifier.
//!
//! Maps ink density and the aspect ratio of the inked extent to a label
//! through a fixed decision table. It is far less accurate than a trained
//! model but needs no weights, which makes it useful for demos and smoke
//! tests of the full pipeline.

use crate::core::constants::DEFAULT_CANONICAL_SIZE;
use crate::core::errors::ClassifierError;
use crate::core::traits::{ClassifierInfo, GlyphClassifier};
use crate::domain::{CanonicalBitmap, Label};

/// Digit guesses by density band, checked in order after the shape rules.
const DIGIT_DENSITY_BANDS: [(f32, f32, u8); 9] = [
    (0.15, 0.25, 7),
    (0.25, 0.35, 4),
    (0.35, 0.45, 2),
    (0.45, 0.55, 3),
    (0.55, 0.65, 5),
    (0.65, 0.75, 6),
    (0.75, 0.85, 8),
    (0.85, 0.95, 9),
    (0.05, 0.15, 0),
];

/// Density/aspect decision-table classifier.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    input_size: u32,
    ink_threshold: u8,
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_CANONICAL_SIZE,
            ink_threshold: 128,
        }
    }
}

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the side length of bitmaps this classifier accepts.
    pub fn input_size(mut self, size: u32) -> Self {
        self.input_size = size;
        self
    }

    /// Sets the intensity at which a pixel counts towards the inked extent.
    pub fn ink_threshold(mut self, threshold: u8) -> Self {
        self.ink_threshold = threshold;
        self
    }

    fn decide(density: f32, aspect_ratio: f32) -> Option<Label> {
        if density > 0.4 && density < 0.6 {
            return Some(if aspect_ratio < 0.8 {
                Label::Digit(1)
            } else {
                Label::Plus
            });
        }
        if density > 0.7 {
            return Some(Label::Equals);
        }
        if density > 0.2 && density < 0.4 {
            return Some(if aspect_ratio > 1.2 {
                Label::Minus
            } else {
                Label::X
            });
        }
        DIGIT_DENSITY_BANDS
            .iter()
            .find(|(lo, hi, _)| (*lo..=*hi).contains(&density))
            .map(|&(_, _, digit)| Label::Digit(digit))
    }
}

impl GlyphClassifier for HeuristicClassifier {
    fn info(&self) -> ClassifierInfo {
        ClassifierInfo::new(
            "heuristic",
            self.input_size,
            "ink density and aspect ratio decision table",
        )
    }

    fn classify(&self, bitmap: &CanonicalBitmap) -> Result<Label, ClassifierError> {
        self.check_input(bitmap)?;

        let extent = bitmap
            .ink_extent(self.ink_threshold)
            .ok_or_else(|| ClassifierError::Unrecognized {
                reason: "bitmap contains no ink".to_string(),
            })?;
        let aspect_ratio = extent.width as f32 / extent.height as f32;
        let density = bitmap.ink_density();

        Self::decide(density, aspect_ratio).ok_or_else(|| ClassifierError::Unrecognized {
            reason: format!(
                "density {density:.3} with aspect ratio {aspect_ratio:.2} matches no rule"
            ),
        })
    }
}
