//! Glyph classification stage processor.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::types::{StageMetrics, StageResult};
use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::{DEFAULT_CLASSIFY_BATCH_SIZE, DEFAULT_CLASSIFY_PARALLEL_THRESHOLD};
use crate::core::errors::{ClassifierError, EqResult, EquationError};
use crate::core::traits::GlyphClassifier;
use crate::domain::{CanonicalBitmap, GlyphRegion, Label, LabeledSymbol};

/// Configuration for classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Bitmaps handed to the classifier per call.
    pub batch_size: usize,
    /// Batches run in parallel when there are more than this many.
    pub parallel_threshold: usize,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_CLASSIFY_BATCH_SIZE,
            parallel_threshold: DEFAULT_CLASSIFY_PARALLEL_THRESHOLD,
        }
    }
}

impl ConfigValidator for ClassificationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_batch_size(self.batch_size)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

type Labeled = (usize, Result<Label, ClassifierError>);

/// Processor for the classification stage.
///
/// Glyphs are split into batches that may be classified concurrently; every
/// label is reattached to the ordinal of the glyph it came from before the
/// stream is returned. The first failing glyph in reading order aborts the
/// stage.
pub struct ClassificationStageProcessor;

impl ClassificationStageProcessor {
    pub fn process<C>(
        classifier: &C,
        glyphs: &[GlyphRegion],
        config: Option<&ClassificationConfig>,
    ) -> EqResult<StageResult<Vec<LabeledSymbol>>>
    where
        C: GlyphClassifier + ?Sized,
    {
        let start_time = Instant::now();
        let default_config = ClassificationConfig::default();
        let config = config.unwrap_or(&default_config);
        let batch_size = config.batch_size.max(1);

        let batches: Vec<&[GlyphRegion]> = glyphs.chunks(batch_size).collect();
        let use_parallel = batches.len() > config.parallel_threshold;
        debug!(
            "Classifying {} glyphs in {} batches with '{}'{}",
            glyphs.len(),
            batches.len(),
            classifier.info().name,
            if use_parallel { " (parallel)" } else { "" }
        );

        let mut labeled: Vec<Labeled> = if use_parallel {
            batches
                .par_iter()
                .flat_map_iter(|batch| Self::classify_batch(classifier, batch))
                .collect()
        } else {
            batches
                .iter()
                .flat_map(|batch| Self::classify_batch(classifier, batch))
                .collect()
        };
        labeled.sort_by_key(|(ordinal, _)| *ordinal);

        let mut symbols = Vec::with_capacity(labeled.len());
        for (ordinal, result) in labeled {
            match result {
                Ok(label) => symbols.push(LabeledSymbol::new(ordinal, label)),
                Err(source) => {
                    warn!("Classification failed for glyph {}: {}", ordinal, source);
                    return Err(EquationError::classification(ordinal, source));
                }
            }
        }

        let metrics = StageMetrics::new(symbols.len(), 0)
            .with_processing_time(start_time.elapsed())
            .with_info("stage", "classification")
            .with_info("batches", batches.len().to_string())
            .with_info("parallel_processing", use_parallel.to_string());

        Ok(StageResult::new(symbols, metrics))
    }

    fn classify_batch<C>(classifier: &C, batch: &[GlyphRegion]) -> Vec<Labeled>
    where
        C: GlyphClassifier + ?Sized,
    {
        let bitmaps: Vec<&CanonicalBitmap> = batch.iter().map(|g| &g.bitmap).collect();
        let results = classifier.classify_batch(&bitmaps);
        if results.len() != batch.len() {
            let returned = results.len();
            return batch
                .iter()
                .map(|g| {
                    let err = ClassifierError::Backend(
                        format!("batch returned {returned} labels for {} bitmaps", batch.len())
                            .into(),
                    );
                    (g.ordinal, Err(err))
                })
                .collect();
        }
        batch
            .iter()
            .map(|g| g.ordinal)
            .zip(results.into_iter().map(|r| r.and_then(Label::validate)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::ClassifierInfo;
    use crate::domain::adapters::ScriptedClassifier;
    use crate::domain::BoundingRect;
    use image::{GrayImage, Luma};

    /// Labels a glyph by the intensity of its top-left pixel, so results do
    /// not depend on call order.
    #[derive(Debug)]
    struct PixelDigit;

    impl GlyphClassifier for PixelDigit {
        fn info(&self) -> ClassifierInfo {
            ClassifierInfo::new("pixel-digit", 28, "test")
        }

        fn classify(&self, bitmap: &CanonicalBitmap) -> Result<Label, ClassifierError> {
            match bitmap.as_image().get_pixel(0, 0).0[0] {
                v @ 0..=9 => Ok(Label::Digit(v)),
                v => Err(ClassifierError::Unrecognized {
                    reason: format!("marker {v}"),
                }),
            }
        }
    }

    fn glyph(ordinal: usize, marker: u8) -> GlyphRegion {
        let bitmap = CanonicalBitmap::new(GrayImage::from_pixel(28, 28, Luma([marker])))
            .expect("square");
        GlyphRegion {
            ordinal,
            bounding_box: BoundingRect::new(ordinal as u32 * 10, 0, 5, 5),
            crop_box: BoundingRect::new(ordinal as u32 * 10, 0, 5, 5),
            contour_area: 16.0,
            patch: GrayImage::new(5, 5),
            bitmap,
        }
    }

    #[test]
    fn test_labels_reattached_in_parallel() {
        let glyphs: Vec<GlyphRegion> = (0..40).map(|i| glyph(i, (i % 10) as u8)).collect();
        let config = ClassificationConfig {
            batch_size: 3,
            parallel_threshold: 0,
        };
        let result = ClassificationStageProcessor::process(&PixelDigit, &glyphs, Some(&config))
            .expect("classified");
        assert_eq!(result.data.len(), 40);
        for (i, symbol) in result.data.iter().enumerate() {
            assert_eq!(symbol.ordinal, i);
            assert_eq!(symbol.label, Label::Digit((i % 10) as u8));
        }
    }

    #[test]
    fn test_first_failure_in_reading_order_aborts() {
        let glyphs = vec![glyph(0, 1), glyph(1, 200), glyph(2, 3), glyph(3, 201)];
        let err = ClassificationStageProcessor::process(&PixelDigit, &glyphs, None)
            .expect_err("glyph 1 is unrecognized");
        assert!(matches!(err, EquationError::Classification { ordinal: 1, .. }));
    }

    #[derive(Debug)]
    struct OverflowDigit;

    impl GlyphClassifier for OverflowDigit {
        fn info(&self) -> ClassifierInfo {
            ClassifierInfo::new("overflow-digit", 28, "test")
        }

        fn classify(&self, bitmap: &CanonicalBitmap) -> Result<Label, ClassifierError> {
            Ok(Label::Digit(bitmap.as_image().get_pixel(0, 0).0[0]))
        }
    }

    #[test]
    fn test_out_of_range_digit_is_a_classification_error() {
        let glyphs = vec![glyph(0, 4), glyph(1, 12), glyph(2, 7)];
        let err = ClassificationStageProcessor::process(&OverflowDigit, &glyphs, None)
            .expect_err("digit 12 is not a label");
        assert!(matches!(
            err,
            EquationError::Classification {
                ordinal: 1,
                source: ClassifierError::UnknownLabel { .. },
            }
        ));
    }

    #[test]
    fn test_scripted_classifier_sequential() {
        let glyphs: Vec<GlyphRegion> = (0..3).map(|i| glyph(i, 0)).collect();
        let classifier = ScriptedClassifier::from_text("2+2").expect("script");
        let result = ClassificationStageProcessor::process(&classifier, &glyphs, None)
            .expect("classified");
        let labels: Vec<Label> = result.data.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec![Label::Digit(2), Label::Plus, Label::Digit(2)]);
    }

    #[test]
    fn test_empty_input() {
        let result = ClassificationStageProcessor::process(&PixelDigit, &[], None)
            .expect("classified");
        assert!(result.data.is_empty());
    }
}
