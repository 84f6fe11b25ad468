//! Domain-level structures shared across the equation pipeline.
//!
//! The data model flows strictly forward: [`BinaryMask`] → [`GlyphRegion`]s →
//! [`LabeledSymbol`]s → [`NormalizedExpression`] → [`EquationResult`].
//! Classifier adapters live in [`adapters`].

pub mod adapters;
pub mod expression;
pub mod glyph;
pub mod label;
pub mod mask;
pub mod result;

pub use expression::NormalizedExpression;
pub use glyph::{BoundingRect, CanonicalBitmap, GlyphRegion};
pub use label::{Label, LabeledSymbol};
pub use mask::BinaryMask;
pub use result::{EquationResult, Number, Solution};
