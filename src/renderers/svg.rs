//! SVG drawing surface.

use std::io::Write;

use super::{DrawingSurface, TextAnchor, draw_diagram};
use crate::error::Result;
use crate::layout::LayoutResult;

// ── Constants ────────────────────────────────────────────────────────────────

const FONT_FAMILY: &str = "Helvetica";
const FONT_SIZE: i32 = 11;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ── SvgSurface ───────────────────────────────────────────────────────────────

/// Collects drawing operations as SVG elements on a fixed-size canvas.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: i64,
    height: i64,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// The complete standalone document.
    pub fn document(&self) -> String {
        let (w, h) = (self.width, self.height);
        let mut doc = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        doc.push('\n');
        for element in &self.elements {
            doc.push_str(element);
            doc.push('\n');
        }
        doc.push_str("</svg>\n");
        doc
    }
}

impl DrawingSurface for SvgSurface {
    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, stroke: &str, fill: &str) {
        let (stroke, fill) = (escape(stroke), escape(fill));
        self.elements.push(format!(
            r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" stroke="{stroke}" fill="{fill}"/>"#
        ));
    }

    fn draw_text(&mut self, content: &str, x: f64, y: f64, anchor: TextAnchor) {
        let anchor = anchor.as_str();
        let content = escape(content);
        self.elements.push(format!(
            r#"<text x="{x}" y="{y}" text-anchor="{anchor}" font-family="{FONT_FAMILY}" font-size="{FONT_SIZE}">{content}</text>"#
        ));
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) {
        let stroke = escape(stroke);
        self.elements.push(format!(
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{stroke}"/>"#
        ));
    }

    fn emit_to_stream(&self, out: &mut dyn Write) -> Result<()> {
        out.write_all(self.document().as_bytes())?;
        Ok(())
    }
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Render a layout to a standalone SVG document.
pub fn render_svg(result: &LayoutResult) -> String {
    let mut surface = SvgSurface::new(result.width, result.height);
    draw_diagram(&mut surface, result);
    surface.document()
}

#[cfg(test)]
#[path = "../../tests/rust/test_renderers_svg.rs"]
mod tests;
