//! Diagram renderers.
//!
//! A renderer only needs a [`DrawingSurface`]: boxes, text, lines, and a way
//! to write the finished drawing out. [`draw_diagram`] paints a
//! [`LayoutResult`] onto any such surface.

pub mod svg;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use svg::{SvgSurface, render_svg};

use crate::error::Result;
use crate::layout::LayoutResult;

// ─── Palette ─────────────────────────────────────────────────────────────────

pub const STROKE: &str = "#000";
pub const MODULE_FILL: &str = "#ffc";
/// Text baseline, measured down from the top of a module box.
pub const LABEL_BASELINE: i64 = 13;

// ─── DrawingSurface ──────────────────────────────────────────────────────────

/// Horizontal alignment of text relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Primitive vector drawing operations.
pub trait DrawingSurface {
    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, stroke: &str, fill: &str);

    fn draw_text(&mut self, content: &str, x: f64, y: f64, anchor: TextAnchor);

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str);

    /// Write the finished drawing.
    fn emit_to_stream(&self, out: &mut dyn Write) -> Result<()>;

    fn emit_to_file(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.emit_to_stream(&mut out)?;
        out.flush()?;
        Ok(())
    }
}

/// Paint every module box with its name, then every connector.
///
/// Boxes are shifted by half a pixel so their one-pixel outline lands on
/// whole pixels.
pub fn draw_diagram<S: DrawingSurface + ?Sized>(surface: &mut S, result: &LayoutResult) {
    for p in &result.positions {
        surface.draw_rect(
            p.x as f64 - 0.5,
            p.y as f64 - 0.5,
            p.width as f64,
            p.height as f64,
            STROKE,
            MODULE_FILL,
        );
        surface.draw_text(
            &p.module,
            p.middle_x() as f64,
            (p.y + LABEL_BASELINE) as f64,
            TextAnchor::Middle,
        );
    }

    for line in &result.lines {
        surface.draw_line(
            line.x1 as f64,
            line.y1 as f64,
            line.x2 as f64,
            line.y2 as f64,
            STROKE,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_renderers.rs"]
mod tests;
