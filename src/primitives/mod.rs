//! Low-level primitives
//!
//! Text normalization, language detection and syntax tokenization.

pub mod highlighter;
pub mod language;
pub mod normalize;
