//! Subcommand implementations

pub mod readme;
pub mod render;
