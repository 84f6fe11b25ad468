//! Pipeline configuration and JSON loading.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::stages::{ClassificationConfig, SegmentationConfig};
use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::errors::EqResult;
use crate::processors::PreprocessConfig;
use crate::solver::SolverConfig;

/// Configuration of every stage of an [`EquationPipeline`](super::EquationPipeline).
///
/// All fields have defaults, so a JSON document only needs the values it
/// overrides:
///
/// ```json
/// { "segmentation": { "min_area": 60.0 }, "collect_artifacts": true }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub preprocess: PreprocessConfig,
    pub segmentation: SegmentationConfig,
    pub classification: ClassificationConfig,
    pub solver: SolverConfig,
    /// Keep intermediate images and glyphs in the output.
    pub collect_artifacts: bool,
}

impl PipelineConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> EqResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        debug!("Loaded pipeline configuration from {}", path.display());
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ConfigValidator for PipelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.preprocess.validate()?;
        self.segmentation.validate()?;
        self.classification.validate()?;
        self.solver.validate()?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
