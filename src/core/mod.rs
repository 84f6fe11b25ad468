//! The core module of the equation pipeline.
//!
//! This module contains the fundamental pieces shared by every stage:
//! - Configuration validation
//! - Constants used throughout the pipeline
//! - Error handling
//! - The classifier trait the pipeline is injected with

pub mod config;
pub mod constants;
pub mod errors;
pub mod traits;

pub use config::{ConfigError, ConfigValidator};
pub use constants::*;
pub use errors::{ClassifierError, EqResult, EquationError, ErrorKind, PipelineStage};
pub use traits::GlyphClassifier;

pub use crate::utils::init_tracing;
