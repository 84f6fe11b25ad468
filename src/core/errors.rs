//! Error types for the equation pipeline.
//!
//! Every stage either returns a typed result or fails with one of the
//! variants of [`EquationError`]. The error carries enough detail to tell
//! which stage failed ([`EquationError::stage`]) and how
//! ([`EquationError::kind`]), so a caller can render a diagnostic without
//! matching on every variant.

use crate::core::config::ConfigError;
use thiserror::Error;

/// Stages of the equation pipeline, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Configuration, image loading and other work before the first stage.
    Setup,
    /// Grayscale conversion, binarization and noise removal.
    Preprocess,
    /// Contour detection and glyph extraction.
    Segment,
    /// Glyph classification through the injected classifier.
    Classify,
    /// Symbol stream assembly and rewriting.
    Assemble,
    /// Expression parsing and solving.
    Solve,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Setup => write!(f, "setup"),
            PipelineStage::Preprocess => write!(f, "preprocessing"),
            PipelineStage::Segment => write!(f, "segmentation"),
            PipelineStage::Classify => write!(f, "classification"),
            PipelineStage::Assemble => write!(f, "assembly"),
            PipelineStage::Solve => write!(f, "solving"),
        }
    }
}

/// Flat error kind, one per [`EquationError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidImage,
    NoGlyphsDetected,
    Classification,
    EmptyExpression,
    MultipleEqualitySigns,
    Parse,
    DivisionByZero,
    Unsupported,
    InvalidInput,
    Config,
    ImageLoad,
    Io,
}

/// Errors produced by the classifier boundary.
///
/// Adapters return these; the pipeline wraps them into
/// [`EquationError::Classification`] together with the glyph ordinal.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// The classifier could not map the bitmap to any label of the alphabet.
    #[error("glyph not recognized: {reason}")]
    Unrecognized {
        /// Why the glyph was rejected.
        reason: String,
    },

    /// The classifier returned a label outside the alphabet.
    #[error("label '{label}' is not part of the alphabet")]
    UnknownLabel {
        /// The offending label text.
        label: String,
    },

    /// A bitmap did not have the shape the classifier expects.
    #[error("bitmap shape {actual}x{actual} does not match expected {expected}x{expected}")]
    ShapeMismatch {
        /// Expected side length.
        expected: u32,
        /// Received side length.
        actual: u32,
    },

    /// A scripted or batched classifier ran out of answers.
    #[error("classifier exhausted after {served} labels")]
    Exhausted {
        /// Number of labels already served.
        served: usize,
    },

    /// Backend-specific failure (model runtime, IO, ...).
    #[error("classifier backend")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Enum representing every failure the pipeline can surface.
#[derive(Error, Debug)]
pub enum EquationError {
    /// The input has zero area or cannot be interpreted as an image.
    #[error("invalid image: {message}")]
    InvalidImage {
        /// A message describing the problem.
        message: String,
    },

    /// Segmentation found no glyph above the noise threshold.
    #[error("no glyphs detected")]
    NoGlyphsDetected,

    /// The classifier failed for one glyph; the attempt is aborted.
    #[error("classification failed for glyph {ordinal}")]
    Classification {
        /// Ordinal position of the glyph in reading order.
        ordinal: usize,
        /// The adapter error.
        #[source]
        source: ClassifierError,
    },

    /// Assembly produced nothing usable.
    #[error("expression is empty after normalization")]
    EmptyExpression,

    /// More than one `=` in the expression.
    #[error("expression contains {count} equality signs, at most one is allowed")]
    MultipleEqualitySigns {
        /// Number of `=` found.
        count: usize,
    },

    /// The expression grammar was violated.
    #[error("parse error at position {position}: {message}")]
    Parse {
        /// Byte offset in the (sub)expression where parsing failed.
        position: usize,
        /// A message describing the violation.
        message: String,
    },

    /// Division by zero in an evaluated expression.
    #[error("division by zero")]
    DivisionByZero,

    /// Well-formed input the solving method does not handle.
    #[error("unsupported expression: {reason}")]
    Unsupported {
        /// What is unsupported.
        reason: String,
    },

    /// API misuse, e.g. symbols passed out of reading order.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Invalid configuration.
    #[error("configuration")]
    Config(#[from] ConfigError),

    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[from] image::ImageError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for pipeline operations.
pub type EqResult<T> = Result<T, EquationError>;

impl EquationError {
    /// Creates an [`EquationError::InvalidImage`].
    pub fn invalid_image(message: impl Into<String>) -> Self {
        Self::InvalidImage {
            message: message.into(),
        }
    }

    /// Creates an [`EquationError::Parse`].
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Creates an [`EquationError::Unsupported`].
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    /// Creates an [`EquationError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Wraps a classifier failure for the glyph at `ordinal`.
    pub fn classification(ordinal: usize, source: ClassifierError) -> Self {
        Self::Classification { ordinal, source }
    }

    /// Returns the flat kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidImage { .. } => ErrorKind::InvalidImage,
            Self::NoGlyphsDetected => ErrorKind::NoGlyphsDetected,
            Self::Classification { .. } => ErrorKind::Classification,
            Self::EmptyExpression => ErrorKind::EmptyExpression,
            Self::MultipleEqualitySigns { .. } => ErrorKind::MultipleEqualitySigns,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::DivisionByZero => ErrorKind::DivisionByZero,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::Config(_) => ErrorKind::Config,
            Self::ImageLoad(_) => ErrorKind::ImageLoad,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns the pipeline stage this error originates from.
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::InvalidImage { .. } => PipelineStage::Preprocess,
            Self::NoGlyphsDetected => PipelineStage::Segment,
            Self::Classification { .. } => PipelineStage::Classify,
            Self::EmptyExpression => PipelineStage::Assemble,
            Self::MultipleEqualitySigns { .. }
            | Self::Parse { .. }
            | Self::DivisionByZero
            | Self::Unsupported { .. } => PipelineStage::Solve,
            Self::InvalidInput { .. } | Self::Config(_) | Self::ImageLoad(_) | Self::Io(_) => {
                PipelineStage::Setup
            }
        }
    }

    /// Whether the caller may present this as "nothing to solve" rather than a failure.
    pub fn is_nothing_to_solve(&self) -> bool {
        matches!(self, Self::NoGlyphsDetected | Self::EmptyExpression)
    }

    /// Shifts the position of a parse error, used when a side of an equation
    /// is parsed on its own.
    pub(crate) fn offset_position(self, offset: usize) -> Self {
        match self {
            Self::Parse { position, message } => Self::Parse {
                position: position + offset,
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_and_kind_mapping() {
        let err = EquationError::classification(
            3,
            ClassifierError::Unrecognized {
                reason: "density".to_string(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::Classification);
        assert_eq!(err.stage(), PipelineStage::Classify);

        assert_eq!(EquationError::DivisionByZero.stage(), PipelineStage::Solve);
        assert_eq!(
            EquationError::NoGlyphsDetected.stage(),
            PipelineStage::Segment
        );
        assert_eq!(
            EquationError::invalid_image("zero area").stage(),
            PipelineStage::Preprocess
        );
    }

    #[test]
    fn test_nothing_to_solve() {
        assert!(EquationError::NoGlyphsDetected.is_nothing_to_solve());
        assert!(EquationError::EmptyExpression.is_nothing_to_solve());
        assert!(!EquationError::DivisionByZero.is_nothing_to_solve());
    }

    #[test]
    fn test_classification_error_keeps_source() {
        use std::error::Error;
        let err = EquationError::classification(0, ClassifierError::Exhausted { served: 2 });
        let source = err.source().expect("source should be attached");
        assert_eq!(source.to_string(), "classifier exhausted after 2 labels");
    }

    #[test]
    fn test_offset_position() {
        let err = EquationError::parse(2, "unexpected operator").offset_position(5);
        match err {
            EquationError::Parse { position, .. } => assert_eq!(position, 7),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
