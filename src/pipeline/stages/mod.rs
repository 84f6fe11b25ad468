//! Stage processors of the equation pipeline.
//!
//! Each processor owns one step between the binary mask and the labeled
//! symbol stream, returns its data in a [`StageResult`] with
//! [`StageMetrics`], and takes an optional stage config that falls back to
//! defaults.

pub mod classification;
pub mod segmentation;
pub mod types;

pub use classification::{ClassificationConfig, ClassificationStageProcessor};
pub use segmentation::{SegmentationConfig, SegmentationResult, SegmentationStageProcessor};
pub use types::{PipelineMetrics, StageMetrics, StageResult};
