//! Glyph classifier trait definitions.
//!
//! The classifier is the one component the pipeline does not implement
//! itself: it is injected as a [`GlyphClassifier`] and invoked once per
//! canonical bitmap (or once per batch of them). Any trained model, a
//! heuristic, or a scripted stub can sit behind this boundary.

use crate::core::errors::ClassifierError;
use crate::domain::{CanonicalBitmap, Label};
use std::fmt::Debug;

/// Information about a classifier adapter.
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Name of the classifier (e.g., "heuristic", "scripted", "cnn-28").
    pub name: String,
    /// Side length of the square bitmaps it expects.
    pub input_size: u32,
    /// Description of the classifier.
    pub description: String,
}

impl ClassifierInfo {
    /// Creates a new classifier info.
    pub fn new(name: impl Into<String>, input_size: u32, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_size,
            description: description.into(),
        }
    }
}

/// Core trait for glyph classifiers.
///
/// Implementations map one canonical bitmap to exactly one [`Label`].
/// Calls are synchronous and are not retried; an error aborts the current
/// solve attempt.
pub trait GlyphClassifier: Send + Sync + Debug {
    /// Returns information about this classifier.
    fn info(&self) -> ClassifierInfo;

    /// Classifies a single canonical bitmap.
    fn classify(&self, bitmap: &CanonicalBitmap) -> Result<Label, ClassifierError>;

    /// Classifies a batch of bitmaps.
    ///
    /// The returned vector must have one entry per input, in input order.
    /// The default implementation calls [`GlyphClassifier::classify`] per item.
    fn classify_batch(&self, bitmaps: &[&CanonicalBitmap]) -> Vec<Result<Label, ClassifierError>> {
        bitmaps.iter().map(|bitmap| self.classify(bitmap)).collect()
    }

    /// Returns whether this classifier can handle batched inputs efficiently.
    fn supports_batching(&self) -> bool {
        false
    }

    /// Checks that a bitmap has the side length this classifier expects.
    fn check_input(&self, bitmap: &CanonicalBitmap) -> Result<(), ClassifierError> {
        let expected = self.info().input_size;
        if bitmap.size() != expected {
            return Err(ClassifierError::ShapeMismatch {
                expected,
                actual: bitmap.size(),
            });
        }
        Ok(())
    }
}

impl<C: GlyphClassifier + ?Sized> GlyphClassifier for Box<C> {
    fn info(&self) -> ClassifierInfo {
        (**self).info()
    }

    fn classify(&self, bitmap: &CanonicalBitmap) -> Result<Label, ClassifierError> {
        (**self).classify(bitmap)
    }

    fn classify_batch(&self, bitmaps: &[&CanonicalBitmap]) -> Vec<Result<Label, ClassifierError>> {
        (**self).classify_batch(bitmaps)
    }

    fn supports_batching(&self) -> bool {
        (**self).supports_batching()
    }
}
