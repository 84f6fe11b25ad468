//! The equation pipeline module.
//!
//! This module wires the preprocessor, the stage processors, the symbol
//! assembler and the solver into [`EquationPipeline`], the single entry point
//! from a decoded image to an [`EquationResult`](crate::domain::EquationResult).

mod config;
pub mod equation;
pub mod stages;

pub use config::PipelineConfig;
pub use equation::{EquationPipeline, EquationPipelineBuilder, PipelineArtifacts, PipelineOutput};
pub use stages::{
    ClassificationConfig, ClassificationStageProcessor, PipelineMetrics, SegmentationConfig,
    SegmentationResult, SegmentationStageProcessor, StageMetrics, StageResult,
};
