//! Line-numbered, syntax-highlighted code blocks.
//!
//! A [`view::code_block::CodeBlock`] turns raw source text into a rendered
//! view model: normalized text, an inferred language, tokenized lines with
//! stable keys, and a copy-to-clipboard affordance whose "copied" state
//! resets itself after a delay. The view model can be serialized to HTML
//! or drawn as a ratatui widget.

pub mod config;
pub mod primitives;
pub mod services;
pub mod view;
