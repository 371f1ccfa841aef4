//! Utility modules shared by the assembler and the CLI.

pub mod minify;
pub mod template;
