//! View layer
//!
//! The code block renderer and the surfaces it can be drawn on.

pub mod code_block;
pub mod html;
pub mod terminal;
pub mod theme;
pub mod widget;
