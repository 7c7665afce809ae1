//! Layout types: Position, Metrics, Placement, LayoutResult.

use std::fmt;

use super::geometry::ConnectorLine;
use crate::error::Result;

// ─── Position ────────────────────────────────────────────────────────────────

/// A module box on the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub module: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Position {
    pub fn new(module: impl Into<String>, x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            module: module.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn geometry(&self) -> BoxGeometry {
        BoxGeometry {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn middle_x(&self) -> i64 {
        self.geometry().middle_x()
    }

    pub fn top(&self) -> i64 {
        self.geometry().top()
    }

    pub fn bottom(&self) -> i64 {
        self.geometry().bottom()
    }
}

/// Box extents without the module name, so the search can place connectors
/// without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoxGeometry {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl BoxGeometry {
    pub fn middle_x(&self) -> i64 {
        self.x + self.width / 2
    }

    /// Where connectors to this module's upstreams start: one pixel above
    /// the box.
    pub fn top(&self) -> i64 {
        self.y - 1
    }

    /// Where connectors from this module's downstreams end.
    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// The connector from this box up to `upstream`.
    pub fn connector_to(&self, upstream: &BoxGeometry) -> Result<ConnectorLine> {
        ConnectorLine::new(self.middle_x(), self.top(), upstream.middle_x(), upstream.bottom())
    }
}

// ─── Metrics ─────────────────────────────────────────────────────────────────

/// Quality of a layout; lower is better, compared field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Metrics {
    /// Unordered pairs of connectors that cross.
    pub crossing_count: usize,
    /// Sum of squared horizontal deltas over all connectors.
    pub slope_score: i64,
    /// Always zero for now.
    pub tie_break_weight: i64,
}

impl Metrics {
    pub fn is_better_than(&self, other: &Metrics) -> bool {
        self < other
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{crossings: {}, slope: {}, tieBreak: {}}}",
            self.crossing_count, self.slope_score, self.tie_break_weight
        )
    }
}

// ─── Placement ───────────────────────────────────────────────────────────────

/// Which stage produced the emitted positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Initial placement refined by the local heuristic only.
    HeuristicPlaced,
    /// The branch-and-bound search found a strictly better layout.
    OptimizedPlaced,
}

// ─── LayoutResult ────────────────────────────────────────────────────────────

/// Outcome of the branch-and-bound phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    /// Search tree nodes entered, summed over all workers.
    pub visited: u64,
    /// False when the deadline cut the search short.
    pub completed: bool,
}

/// The final layout handed to a renderer.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// Sorted by level, then left to right.
    pub positions: Vec<Position>,
    /// One connector per (module, direct upstream) pair.
    pub lines: Vec<ConnectorLine>,
    pub metrics: Metrics,
    pub placement: Placement,
    /// Slots available on every level.
    pub slot_count: usize,
    pub width: i64,
    pub height: i64,
    /// Present when the search phase ran.
    pub search: Option<SearchReport>,
}

impl LayoutResult {
    pub fn position(&self, module: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.module == module)
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_types.rs"]
mod tests;
