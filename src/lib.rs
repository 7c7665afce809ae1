//! dependency-diagram: layered module dependency diagrams.
//!
//! Public API: `render_declarations()`
//!
//! Pipeline: declarations → modules → `DependencyGraph` (validation, reduction,
//! levels) → `layout()` (heuristic placement, optional branch-and-bound search)
//! → SVG.

pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod renderers;

#[cfg(feature = "wasm")]
mod wasm;

pub use crate::config::{LayoutConfig, Optimize};
pub use crate::error::{Error, Result};
pub use crate::graph::{DependencyGraph, Module};
pub use crate::layout::{LayoutResult, layout};
pub use crate::loader::load_modules;
pub use crate::renderers::render_svg;

/// Parse module declarations, lay them out and render the diagram as SVG.
pub fn render_declarations(src: &str, config: &LayoutConfig) -> Result<String> {
    let graph = DependencyGraph::new(load_modules(src)?)?;
    let result = layout(&graph, config)?;
    Ok(render_svg(&result))
}

#[cfg(test)]
#[path = "../tests/rust/test_api.rs"]
mod tests;
