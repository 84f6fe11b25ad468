//! # eqn-ocr
//!
//! A Rust library that solves photographed hand-written arithmetic expressions
//! and single-variable equations.
//!
//! ## Features
//!
//! - Otsu binarization with morphological closing
//! - Contour-based glyph segmentation in reading order
//! - Pluggable glyph classifier behind a single trait
//! - An ordered rewrite-rule table that repairs segmentation artifacts
//! - Exact rational arithmetic and polynomial root finding
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration validation and the classifier trait
//! * [`domain`] - Masks, glyphs, labels, expressions, results and classifier adapters
//! * [`pipeline`] - Stage processors and the [`EquationPipeline`](pipeline::EquationPipeline)
//! * [`processors`] - Binarization, contours, resizing and symbol assembly
//! * [`solver`] - Lexer, parser, evaluator and root finding
//! * [`utils`] - Image loading, classifier tensors and overlays
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eqn_ocr::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = EquationPipeline::new(HeuristicClassifier::new());
//! let output = pipeline.run_path(Path::new("equation.jpg"))?;
//! println!("{} => {}", output.expression, output.result);
//! # Ok(())
//! # }
//! ```
//!
//! ### Solving a label sequence
//!
//! The image stages can be skipped when the labels are already known:
//!
//! ```rust
//! use eqn_ocr::prelude::*;
//!
//! let pipeline = EquationPipeline::new(HeuristicClassifier::new());
//! let labels = Label::parse_sequence("x2-4--0").unwrap();
//! let (expression, result) = pipeline.solve_labels(&labels).unwrap();
//! assert_eq!(expression.as_str(), "x^2-4=0");
//! assert_eq!(result.to_string(), "x = -2, x = 2");
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod solver;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use eqn_ocr::prelude::*;
/// ```
///
/// Included items cover the common path from an image to an answer:
/// - The pipeline and its configuration (`EquationPipeline`, `PipelineConfig`)
/// - The classifier seam and shipped adapters
/// - Domain results (`EquationResult`, `Solution`, `Number`, `Label`)
/// - Essential error and result types (`EquationError`, `EqResult`)
/// - Basic image loading (`load_image`)
pub mod prelude {
    pub use crate::pipeline::{EquationPipeline, PipelineConfig, PipelineOutput};

    pub use crate::core::traits::{ClassifierInfo, GlyphClassifier};
    pub use crate::domain::adapters::{HeuristicClassifier, ScriptedClassifier};

    pub use crate::domain::{EquationResult, Label, NormalizedExpression, Number, Solution};

    pub use crate::core::{ClassifierError, ConfigValidator, EqResult, EquationError};

    pub use crate::utils::load_image;
}
