//! Report output: JSON files and terminal summaries

pub mod console;
pub mod json;
