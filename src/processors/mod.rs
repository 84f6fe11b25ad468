//! Image and symbol processors used by the pipeline stages.
//!
//! - [`preprocess`]: grayscale conversion, Otsu binarization, closing
//! - [`morphology`]: square-element closing
//! - [`contours`]: external contour extraction and polygon area
//! - [`resize`]: square padding and area-averaging resize
//! - [`assembler`]: the symbol stream rewrite table

pub mod assembler;
pub mod contours;
pub mod morphology;
pub mod preprocess;
pub mod resize;

pub use assembler::{REWRITE_RULES, RewriteRule, SymbolAssembler};
pub use contours::{ExternalContour, external_contours, polygon_area};
pub use morphology::close_square;
pub use preprocess::{PreprocessConfig, PreprocessOutput, Preprocessor};
pub use resize::{pad_to_square, resize_area};
