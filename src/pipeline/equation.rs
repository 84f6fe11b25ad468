//! The equation pipeline.
//!
//! [`EquationPipeline`] runs one solve attempt per image:
//!
//! 1. preprocess the image into a binary ink mask
//! 2. segment the mask into glyphs in reading order
//! 3. classify every glyph through the injected [`GlyphClassifier`]
//! 4. assemble the labels into a normalized expression
//! 5. solve the expression
//!
//! Each step is also exposed on its own so callers can stop early or feed
//! their own intermediate data.

use image::{DynamicImage, GrayImage, RgbImage};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::config::PipelineConfig;
use super::stages::{
    ClassificationStageProcessor, PipelineMetrics, SegmentationResult, SegmentationStageProcessor,
    StageMetrics, StageResult,
};
use crate::core::config::ConfigValidator;
use crate::core::errors::{EqResult, EquationError};
use crate::core::traits::GlyphClassifier;
use crate::domain::{
    BinaryMask, EquationResult, GlyphRegion, Label, LabeledSymbol, NormalizedExpression,
};
use crate::processors::{PreprocessOutput, Preprocessor, RewriteRule, SymbolAssembler};
use crate::solver::Solver;
use crate::utils::{draw_glyph_boxes, load_image};

/// Intermediate data kept when [`PipelineConfig::collect_artifacts`] is set.
#[derive(Debug, Clone)]
pub struct PipelineArtifacts {
    /// Grayscale version of the input.
    pub gray: GrayImage,
    /// Binary ink mask.
    pub mask: BinaryMask,
    /// Segmented glyphs in reading order.
    pub glyphs: Vec<GlyphRegion>,
    /// The input with every glyph's bounding box drawn on it.
    pub overlay: RgbImage,
}

/// Result of one successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Classified symbols in reading order.
    pub symbols: Vec<LabeledSymbol>,
    /// The expression handed to the solver.
    pub expression: NormalizedExpression,
    /// The solver's answer.
    pub result: EquationResult,
    /// Per-stage timings and counts.
    pub metrics: PipelineMetrics,
    /// Intermediate data, if requested.
    pub artifacts: Option<PipelineArtifacts>,
}

impl PipelineOutput {
    /// The raw label string before rewriting, e.g. `"2x--8"`.
    pub fn raw_labels(&self) -> String {
        self.symbols.iter().map(|s| s.label.as_char()).collect()
    }
}

/// Image-to-answer pipeline over an injected glyph classifier.
#[derive(Debug)]
pub struct EquationPipeline<C: GlyphClassifier> {
    classifier: C,
    config: PipelineConfig,
    preprocessor: Preprocessor,
    assembler: SymbolAssembler,
    solver: Solver,
}

impl<C: GlyphClassifier> EquationPipeline<C> {
    /// Creates a pipeline with the default configuration.
    pub fn new(classifier: C) -> Self {
        Self::from_parts(classifier, PipelineConfig::default(), SymbolAssembler::default())
    }

    /// Creates a pipeline with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EquationError::Config`] if the configuration is invalid.
    pub fn with_config(classifier: C, config: PipelineConfig) -> EqResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(classifier, config, SymbolAssembler::default()))
    }

    /// Starts a builder for a pipeline around `classifier`.
    pub fn builder(classifier: C) -> EquationPipelineBuilder<C> {
        EquationPipelineBuilder::new(classifier)
    }

    fn from_parts(classifier: C, config: PipelineConfig, assembler: SymbolAssembler) -> Self {
        let info = classifier.info();
        if info.input_size != config.segmentation.canonical_size {
            warn!(
                "Classifier '{}' expects {}x{} bitmaps but segmentation produces {}x{}",
                info.name,
                info.input_size,
                info.input_size,
                config.segmentation.canonical_size,
                config.segmentation.canonical_size
            );
        }
        Self {
            preprocessor: Preprocessor::new(config.preprocess.clone()),
            solver: Solver::new(config.solver.clone()),
            classifier,
            config,
            assembler,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn assembler(&self) -> &SymbolAssembler {
        &self.assembler
    }

    /// Runs the whole pipeline on a decoded image.
    ///
    /// Solving is all-or-nothing: any stage failure aborts the attempt and no
    /// partial result is returned.
    ///
    /// # Errors
    ///
    /// - [`EquationError::InvalidImage`] for a zero-area image
    /// - [`EquationError::NoGlyphsDetected`] when nothing survives segmentation
    /// - [`EquationError::Classification`] for the first glyph the classifier rejects
    /// - assembly and solver errors for the assembled expression
    pub fn run(&self, image: &DynamicImage) -> EqResult<PipelineOutput> {
        let start_time = Instant::now();

        let (preprocessed, preprocess_metrics) = self.preprocess(image)?.into_parts();
        let (segmentation, segmentation_metrics) = self.segment(&preprocessed.mask)?.into_parts();
        if segmentation.glyphs.is_empty() {
            warn!(
                "No glyphs detected ({} components discarded as noise)",
                segmentation.discarded
            );
            return Err(EquationError::NoGlyphsDetected);
        }

        let (symbols, classification_metrics) = self.classify(&segmentation.glyphs)?.into_parts();
        let expression = self.assemble(&symbols)?;
        let result = self.solve(&expression)?;

        let total_time = start_time.elapsed();
        info!(
            "Solved '{}' from {} glyphs in {:?}: {}",
            expression,
            symbols.len(),
            total_time,
            result
        );

        let artifacts = self.config.collect_artifacts.then(|| PipelineArtifacts {
            overlay: draw_glyph_boxes(image, &segmentation.glyphs),
            gray: preprocessed.gray,
            mask: preprocessed.mask,
            glyphs: segmentation.glyphs,
        });

        Ok(PipelineOutput {
            symbols,
            expression,
            result,
            metrics: PipelineMetrics {
                preprocess: preprocess_metrics,
                segmentation: segmentation_metrics,
                classification: classification_metrics,
                total_time: Some(total_time),
            },
            artifacts,
        })
    }

    /// Loads an image file and runs the pipeline on it.
    pub fn run_path(&self, path: impl AsRef<Path>) -> EqResult<PipelineOutput> {
        let path = path.as_ref();
        info!("Solving image {}", path.display());
        let image = load_image(path)?;
        self.run(&image)
    }

    /// Converts and binarizes `image`.
    pub fn preprocess(&self, image: &DynamicImage) -> EqResult<StageResult<PreprocessOutput>> {
        let start_time = Instant::now();
        let output = self.preprocessor.process(image)?;
        let metrics = StageMetrics::new(1, 0)
            .with_processing_time(start_time.elapsed())
            .with_info("stage", "preprocess")
            .with_info("threshold", output.threshold.to_string())
            .with_info("ink_pixels", output.mask.ink_count().to_string());
        Ok(StageResult::new(output, metrics))
    }

    /// Segments a mask into ordered glyphs. An empty result is not an error here.
    pub fn segment(&self, mask: &BinaryMask) -> EqResult<StageResult<SegmentationResult>> {
        SegmentationStageProcessor::process(mask, Some(&self.config.segmentation))
    }

    /// Classifies glyphs, returning symbols in ordinal order.
    pub fn classify(&self, glyphs: &[GlyphRegion]) -> EqResult<StageResult<Vec<LabeledSymbol>>> {
        ClassificationStageProcessor::process(
            &self.classifier,
            glyphs,
            Some(&self.config.classification),
        )
    }

    /// Assembles labeled symbols into a normalized expression.
    pub fn assemble(&self, symbols: &[LabeledSymbol]) -> EqResult<NormalizedExpression> {
        self.assembler.assemble(symbols)
    }

    /// Solves a normalized expression.
    pub fn solve(&self, expression: &NormalizedExpression) -> EqResult<EquationResult> {
        self.solver.solve(expression)
    }

    /// Assembles and solves a label sequence, skipping the image stages.
    pub fn solve_labels(&self, labels: &[Label]) -> EqResult<(NormalizedExpression, EquationResult)> {
        let expression = self.assembler.assemble_labels(labels)?;
        debug!("Assembled {} labels into '{}'", labels.len(), expression);
        let result = self.solve(&expression)?;
        Ok((expression, result))
    }
}

/// Builder for [`EquationPipeline`].
#[derive(Debug)]
pub struct EquationPipelineBuilder<C: GlyphClassifier> {
    classifier: C,
    config: PipelineConfig,
    extra_rules: Vec<RewriteRule>,
}

impl<C: GlyphClassifier> EquationPipelineBuilder<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            config: PipelineConfig::default(),
            extra_rules: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn closing_kernel(mut self, kernel: u32) -> Self {
        self.config.preprocess.closing_kernel = kernel;
        self
    }

    pub fn min_area(mut self, min_area: f64) -> Self {
        self.config.segmentation.min_area = min_area;
        self
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.config.segmentation.padding = padding;
        self
    }

    pub fn canonical_size(mut self, size: u32) -> Self {
        self.config.segmentation.canonical_size = size;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.classification.batch_size = batch_size;
        self
    }

    pub fn max_degree(mut self, max_degree: u32) -> Self {
        self.config.solver.max_degree = max_degree;
        self
    }

    pub fn collect_artifacts(mut self, collect: bool) -> Self {
        self.config.collect_artifacts = collect;
        self
    }

    /// Appends a rewrite rule after the built-in ones.
    pub fn rewrite_rule(mut self, rule: RewriteRule) -> Self {
        self.extra_rules.push(rule);
        self
    }

    /// Validates the configuration and builds the pipeline.
    pub fn build(self) -> EqResult<EquationPipeline<C>> {
        self.config.validate()?;
        let assembler = self
            .extra_rules
            .into_iter()
            .fold(SymbolAssembler::default(), SymbolAssembler::with_rule);
        Ok(EquationPipeline::from_parts(
            self.classifier,
            self.config,
            assembler,
        ))
    }
}
