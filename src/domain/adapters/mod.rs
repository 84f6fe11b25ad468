//! Classifier adapters.
//!
//! Concrete [`GlyphClassifier`](crate::core::traits::GlyphClassifier)
//! implementations shipped with the crate. A trained model plugs in by
//! implementing the same trait.

pub mod heuristic_classifier;
pub mod scripted_classifier;

pub use heuristic_classifier::HeuristicClassifier;
pub use scripted_classifier::ScriptedClassifier;
