//! Glyph segmentation stage processor.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::types::{StageMetrics, StageResult};
use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::{
    BACKGROUND, DEFAULT_CANONICAL_SIZE, DEFAULT_GLYPH_PADDING, DEFAULT_MIN_GLYPH_AREA,
    DEFAULT_PARALLEL_THRESHOLD,
};
use crate::core::errors::{EqResult, EquationError};
use crate::domain::{BinaryMask, BoundingRect, CanonicalBitmap, GlyphRegion};
use crate::processors::{external_contours, pad_to_square, resize_area};

/// Configuration for segmentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Components whose contour encloses no more than this area (px²) are dropped.
    pub min_area: f64,
    /// Pixels added around each bounding box before cropping.
    pub padding: u32,
    /// Side length of the canonical bitmap.
    pub canonical_size: u32,
    /// Extraction runs in parallel above this many glyphs.
    pub parallel_threshold: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_area: DEFAULT_MIN_GLYPH_AREA,
            padding: DEFAULT_GLYPH_PADDING,
            canonical_size: DEFAULT_CANONICAL_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ConfigValidator for SegmentationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_non_negative(self.min_area, "min_area")?;
        self.validate_size_range(self.padding, 0, 256, "padding")?;
        self.validate_size_range(self.canonical_size, 1, 1024, "canonical_size")?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Result of segmentation.
#[derive(Debug, Clone, Default)]
pub struct SegmentationResult {
    /// Glyphs in reading order; `glyphs[i].ordinal == i`.
    pub glyphs: Vec<GlyphRegion>,
    /// Components dropped as speckle.
    pub discarded: usize,
}

/// A retained component waiting for extraction.
struct Candidate {
    detection_index: usize,
    bounding_box: BoundingRect,
    area: f64,
}

/// Processor for the segmentation stage.
///
/// Finds the outer contour of every ink component, drops speckle, orders the
/// rest left to right and normalizes each into a canonical bitmap. The mask
/// is only read; every crop is a copy.
pub struct SegmentationStageProcessor;

impl SegmentationStageProcessor {
    /// Segments `mask` into ordered glyph regions.
    ///
    /// An ink-free mask yields an empty glyph list, not an error.
    pub fn process(
        mask: &BinaryMask,
        config: Option<&SegmentationConfig>,
    ) -> EqResult<StageResult<SegmentationResult>> {
        let start_time = Instant::now();
        let default_config = SegmentationConfig::default();
        let config = config.unwrap_or(&default_config);

        let contours = external_contours(mask);
        let total = contours.len();

        let mut candidates: Vec<Candidate> = contours
            .iter()
            .filter_map(|contour| {
                let area = contour.area();
                if area <= config.min_area {
                    return None;
                }
                contour.bounding_rect().map(|bounding_box| Candidate {
                    detection_index: contour.detection_index,
                    bounding_box,
                    area,
                })
            })
            .collect();
        let discarded = total - candidates.len();

        // reading order; equal x keeps detection order
        candidates.sort_by_key(|c| (c.bounding_box.x, c.detection_index));

        debug!(
            "Found {} components, kept {}, discarded {} below {} px²",
            total,
            candidates.len(),
            discarded,
            config.min_area
        );

        let use_parallel = candidates.len() > config.parallel_threshold;
        let glyphs: Vec<GlyphRegion> = if use_parallel {
            debug!("Using parallel extraction for {} glyphs", candidates.len());
            candidates
                .par_iter()
                .enumerate()
                .map(|(ordinal, c)| Self::extract(mask, ordinal, c, config))
                .collect::<EqResult<Vec<_>>>()?
        } else {
            candidates
                .iter()
                .enumerate()
                .map(|(ordinal, c)| Self::extract(mask, ordinal, c, config))
                .collect::<EqResult<Vec<_>>>()?
        };

        let metrics = StageMetrics::new(glyphs.len(), discarded)
            .with_processing_time(start_time.elapsed())
            .with_info("stage", "segmentation")
            .with_info("components", total.to_string())
            .with_info("parallel_processing", use_parallel.to_string());

        Ok(StageResult::new(
            SegmentationResult { glyphs, discarded },
            metrics,
        ))
    }

    fn extract(
        mask: &BinaryMask,
        ordinal: usize,
        candidate: &Candidate,
        config: &SegmentationConfig,
    ) -> EqResult<GlyphRegion> {
        let crop_box = candidate
            .bounding_box
            .padded(config.padding, mask.dimensions());
        let patch = mask.crop(&crop_box);
        let squared = pad_to_square(&patch, BACKGROUND);
        let resized = resize_area(&squared, config.canonical_size, config.canonical_size);
        let bitmap = CanonicalBitmap::new(resized).ok_or_else(|| {
            EquationError::invalid_input(format!(
                "cannot build a {0}x{0} canonical bitmap",
                config.canonical_size
            ))
        })?;

        Ok(GlyphRegion {
            ordinal,
            bounding_box: candidate.bounding_box,
            crop_box,
            contour_area: candidate.area,
            patch,
            bitmap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn mask_with(rects: &[(i32, i32, u32, u32)], width: u32, height: u32) -> BinaryMask {
        let mut img = GrayImage::new(width, height);
        for &(x, y, w, h) in rects {
            draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(w, h), Luma([255]));
        }
        BinaryMask::from_image(&img)
    }

    fn segment(mask: &BinaryMask) -> SegmentationResult {
        SegmentationStageProcessor::process(mask, None)
            .expect("segmented")
            .data
    }

    #[test]
    fn test_components_ordered_left_to_right() {
        let mask = mask_with(
            &[(70, 5, 12, 20), (10, 12, 15, 15), (40, 2, 20, 8)],
            100,
            40,
        );
        let result = segment(&mask);
        let xs: Vec<u32> = result.glyphs.iter().map(|g| g.bounding_box.x).collect();
        assert_eq!(xs, vec![10, 40, 70]);
        for (i, glyph) in result.glyphs.iter().enumerate() {
            assert_eq!(glyph.ordinal, i);
            assert_eq!(glyph.bitmap.size(), 28);
        }
    }

    #[test]
    fn test_speckle_is_discarded() {
        let mask = mask_with(&[(5, 5, 3, 3), (20, 5, 20, 20)], 60, 40);
        let result = segment(&mask);
        assert_eq!(result.glyphs.len(), 1);
        assert_eq!(result.discarded, 1);
    }

    #[test]
    fn test_empty_mask_yields_no_glyphs() {
        let result = segment(&BinaryMask::empty(50, 50));
        assert!(result.glyphs.is_empty());
        assert_eq!(result.discarded, 0);
    }

    #[test]
    fn test_equal_x_tie_break_is_stable() {
        // the two bars of an equals sign share their left edge
        let mask = mask_with(&[(10, 10, 30, 6), (10, 24, 30, 6)], 60, 40);
        let first = segment(&mask);
        let second = segment(&mask);
        let ys = |r: &SegmentationResult| -> Vec<u32> {
            r.glyphs.iter().map(|g| g.bounding_box.y).collect()
        };
        assert_eq!(ys(&first), vec![10, 24]);
        assert_eq!(ys(&first), ys(&second));
    }

    #[test]
    fn test_padding_and_edge_clamping() {
        let mask = mask_with(&[(0, 0, 60, 8), (20, 20, 12, 12)], 60, 40);
        let result = segment(&mask);
        assert_eq!(result.glyphs.len(), 2);
        let bar = &result.glyphs[0];
        assert_eq!(bar.bounding_box, BoundingRect::new(0, 0, 60, 8));
        assert_eq!(bar.crop_box, BoundingRect::new(0, 0, 60, 10));
        let square = &result.glyphs[1];
        assert_eq!(square.crop_box, BoundingRect::new(18, 18, 16, 16));
        assert_eq!(square.patch.dimensions(), (16, 16));
    }

    #[test]
    fn test_canonical_bitmap_keeps_wide_glyph_centered() {
        let mask = mask_with(&[(10, 10, 40, 8)], 60, 40);
        let result = segment(&mask);
        let bitmap = result.glyphs[0].bitmap.as_image();
        // padding rows above and below stay background
        assert_eq!(bitmap.get_pixel(14, 0).0[0], 0);
        assert_eq!(bitmap.get_pixel(14, 27).0[0], 0);
        assert!(bitmap.get_pixel(14, 14).0[0] > 128);
    }

    #[test]
    fn test_parallel_extraction_matches_sequential() {
        let rects: Vec<(i32, i32, u32, u32)> =
            (0..12).map(|i| (5 + i * 20, 5, 12, 14)).collect();
        let mask = mask_with(&rects, 260, 30);
        let sequential = SegmentationStageProcessor::process(
            &mask,
            Some(&SegmentationConfig {
                parallel_threshold: usize::MAX,
                ..SegmentationConfig::default()
            }),
        )
        .expect("segmented");
        let parallel = SegmentationStageProcessor::process(
            &mask,
            Some(&SegmentationConfig {
                parallel_threshold: 0,
                ..SegmentationConfig::default()
            }),
        )
        .expect("segmented");
        assert_eq!(sequential.data.glyphs.len(), 12);
        for (a, b) in sequential.data.glyphs.iter().zip(&parallel.data.glyphs) {
            assert_eq!(a.bounding_box, b.bounding_box);
            assert_eq!(a.bitmap, b.bitmap);
        }
        assert_eq!(
            parallel.metrics.additional_info.get("parallel_processing").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(SegmentationConfig::default().validate().is_ok());
        let bad = SegmentationConfig {
            canonical_size: 0,
            ..SegmentationConfig::default()
        };
        assert!(bad.validate().is_err());
        let negative = SegmentationConfig {
            min_area: -1.0,
            ..SegmentationConfig::default()
        };
        assert!(negative.validate().is_err());
    }
}
