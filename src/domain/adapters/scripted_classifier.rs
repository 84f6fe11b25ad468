//! Scripted classifier returning predetermined labels.
//!
//! Used to exercise segmentation, assembly and solving without a trained
//! model. Labels are served in call order, so results are only meaningful
//! when the pipeline classifies sequentially (fewer batches than the
//! classification parallel threshold).

use crate::core::constants::DEFAULT_CANONICAL_SIZE;
use crate::core::errors::ClassifierError;
use crate::core::traits::{ClassifierInfo, GlyphClassifier};
use crate::domain::{CanonicalBitmap, Label};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Classifier that replays a fixed script.
#[derive(Debug)]
pub struct ScriptedClassifier {
    script: Vec<Option<Label>>,
    cursor: AtomicUsize,
    input_size: u32,
}

impl ScriptedClassifier {
    /// Serves `labels` one per call.
    pub fn new(labels: impl IntoIterator<Item = Label>) -> Self {
        Self::with_failures(labels.into_iter().map(Some))
    }

    /// Serves the script; a `None` entry fails that call with
    /// [`ClassifierError::Unrecognized`].
    pub fn with_failures(script: impl IntoIterator<Item = Option<Label>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            cursor: AtomicUsize::new(0),
            input_size: DEFAULT_CANONICAL_SIZE,
        }
    }

    /// Parses a label string such as `"2x2--8"`, one label per character.
    pub fn from_text(text: &str) -> Result<Self, ClassifierError> {
        Ok(Self::new(Label::parse_sequence(text)?))
    }

    /// Sets the side length of bitmaps this classifier accepts.
    pub fn input_size(mut self, size: u32) -> Self {
        self.input_size = size;
        self
    }

    /// Number of labels served so far.
    pub fn served(&self) -> usize {
        self.cursor.load(Ordering::SeqCst).min(self.script.len())
    }
}

impl GlyphClassifier for ScriptedClassifier {
    fn info(&self) -> ClassifierInfo {
        ClassifierInfo::new("scripted", self.input_size, "replays a fixed label script")
    }

    fn classify(&self, bitmap: &CanonicalBitmap) -> Result<Label, ClassifierError> {
        self.check_input(bitmap)?;
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        match self.script.get(index) {
            Some(Some(label)) => Ok(*label),
            Some(None) => Err(ClassifierError::Unrecognized {
                reason: format!("scripted failure at call {index}"),
            }),
            None => Err(ClassifierError::Exhausted {
                served: self.script.len(),
            }),
        }
    }
}
