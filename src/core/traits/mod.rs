//! Trait definitions for the equation pipeline.
//!
//! The only seam the pipeline is generic over is the glyph classifier; the
//! remaining stages are concrete.

pub mod classifier;

pub use classifier::{ClassifierInfo, GlyphClassifier};
