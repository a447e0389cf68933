//! Side-effecting services used by the code block and the CLI

pub mod clipboard;
pub mod copy_feedback;
pub mod tracing_setup;
