//! Constants used throughout the equation pipeline.

/// Side length of the canonical glyph bitmap fed to the classifier.
pub const DEFAULT_CANONICAL_SIZE: u32 = 28;

/// Contours enclosing less area than this (in px²) are treated as speckle.
pub const DEFAULT_MIN_GLYPH_AREA: f64 = 100.0;

/// Padding added around each glyph bounding box before cropping.
pub const DEFAULT_GLYPH_PADDING: u32 = 2;

/// Side length of the square structuring element used for closing.
pub const DEFAULT_CLOSING_KERNEL: u32 = 2;

/// Minimum number of items before a stage switches to parallel processing.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10;

/// Minimum number of classifier batches before classification runs in parallel.
pub const DEFAULT_CLASSIFY_PARALLEL_THRESHOLD: usize = 4;

/// Default number of bitmaps handed to the classifier per batch.
pub const DEFAULT_CLASSIFY_BATCH_SIZE: usize = 16;

/// Highest polynomial degree the algebraic solver accepts.
pub const DEFAULT_MAX_DEGREE: u32 = 16;

/// Largest coefficient magnitude for which rational root candidates are enumerated.
pub const DEFAULT_ROOT_SEARCH_LIMIT: u64 = 1_000_000_000_000;

/// Most tokens accepted on one side of an expression; bounds parser recursion.
pub const MAX_EXPRESSION_TOKENS: usize = 256;

/// Foreground (ink) value in a binary mask.
pub const INK: u8 = 255;

/// Background value in a binary mask.
pub const BACKGROUND: u8 = 0;
