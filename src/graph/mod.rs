//! Dependency graph model and analysis.

pub mod analysis;
pub mod module;

pub use analysis::{DependencyGraph, LevelReport};
pub use module::Module;
