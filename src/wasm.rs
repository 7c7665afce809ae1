//! WASM bindings for dependency-diagram.
//!
//! Exposes `renderSvg` and `renderSvgWithOptions` to JavaScript via
//! wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::config::{LayoutConfig, Optimize};

/// Render module declarations to an SVG document, heuristic layout only.
#[wasm_bindgen(js_name = "renderSvg")]
pub fn render_svg(src: &str) -> Result<String, JsError> {
    render_with(src, Optimize::Off)
}

/// Render module declarations with control over the layout search.
///
/// - `optimize`: false for the heuristic layout only
/// - `deadline_ms`: search budget; negative searches exhaustively
#[wasm_bindgen(js_name = "renderSvgWithOptions")]
pub fn render_svg_with_options(src: &str, optimize: bool, deadline_ms: i32) -> Result<String, JsError> {
    let optimize = if optimize {
        Optimize::from_deadline_ms(Some(deadline_ms.into()))
    } else {
        Optimize::Off
    };
    render_with(src, optimize)
}

fn render_with(src: &str, optimize: Optimize) -> Result<String, JsError> {
    let config = LayoutConfig::default().with_optimize(optimize);
    crate::render_declarations(src, &config).map_err(|e| JsError::new(&e.to_string()))
}
