//! Connector geometry and the exact crossing test.
//!
//! Connectors are drawn top-to-bottom between a module and one of its direct
//! upstreams. Two connectors cross when they swap left/right order somewhere
//! inside the vertical band they share. All arithmetic is exact: a position
//! on a segment is compared as a fraction over the segment's height, widened
//! to `i128`, so coincident points are never lost to rounding.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

// ─── ConnectorLine ───────────────────────────────────────────────────────────

/// A non-horizontal segment, normalised so that `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorLine {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl ConnectorLine {
    /// Build a connector between two points in either order.
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Result<Self> {
        match y1.cmp(&y2) {
            Ordering::Less => Ok(Self { x1, y1, x2, y2 }),
            Ordering::Greater => Ok(Self {
                x1: x2,
                y1: y2,
                x2: x1,
                y2: y1,
            }),
            Ordering::Equal => Err(Error::DegenerateSegment { x1, y1, x2, y2 }),
        }
    }

    pub fn dx(&self) -> i64 {
        self.x2 - self.x1
    }

    pub fn dy(&self) -> i64 {
        self.y2 - self.y1
    }

    pub fn has_same_slope(&self, other: &ConnectorLine) -> bool {
        i128::from(other.dx()) * i128::from(self.dy()) == i128::from(self.dx()) * i128::from(other.dy())
    }

    fn shares_endpoint(&self, other: &ConnectorLine) -> bool {
        (self.x1, self.y1) == (other.x1, other.y1) || (self.x2, self.y2) == (other.x2, other.y2)
    }

    /// `x` at height `y`, as the fraction `numerator / dy()`.
    fn numerator_at(&self, y: i64) -> i128 {
        i128::from(self.x1) * i128::from(self.dy()) + i128::from(self.dx()) * i128::from(y - self.y1)
    }
}

impl fmt::Display for ConnectorLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})-({},{})", self.x1, self.y1, self.x2, self.y2)
    }
}

// ─── Overlap cases ───────────────────────────────────────────────────────────

/// How the vertical extents of two overlapping, distinct, endpoint-disjoint
/// segments relate. Each case fixes the band `[top, bottom]` in which the
/// left/right order of the two segments is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// Same `y1`: band is `[y1, min(a.y2, b.y2)]`; the longer segment is
    /// extrapolated to the shorter one's `y2`.
    SharedTop,
    /// Same `y2`: band is `[max(a.y1, b.y1), y2]`; the longer segment is
    /// extrapolated to the shorter one's `y1`.
    SharedBottom,
    /// One extent strictly contains the other: band is the inner extent;
    /// the outer segment is extrapolated at both inner ends.
    Nested,
    /// Extents interleave: band is `[max(y1), min(y2)]`; each segment is
    /// extrapolated at the end of the band it does not own.
    Staggered,
}

impl Overlap {
    /// Classify two segments whose open extents intersect.
    pub fn classify(a: &ConnectorLine, b: &ConnectorLine) -> Self {
        if a.y1 == b.y1 {
            Overlap::SharedTop
        } else if a.y2 == b.y2 {
            Overlap::SharedBottom
        } else if (a.y1 < b.y1 && b.y2 < a.y2) || (b.y1 < a.y1 && a.y2 < b.y2) {
            Overlap::Nested
        } else {
            Overlap::Staggered
        }
    }

    /// The band in which the two segments are compared.
    pub fn band(self, a: &ConnectorLine, b: &ConnectorLine) -> (i64, i64) {
        match self {
            Overlap::SharedTop => (a.y1, a.y2.min(b.y2)),
            Overlap::SharedBottom => (a.y1.max(b.y1), a.y2),
            Overlap::Nested => {
                if a.y1 < b.y1 {
                    (b.y1, b.y2)
                } else {
                    (a.y1, a.y2)
                }
            }
            Overlap::Staggered => (a.y1.max(b.y1), a.y2.min(b.y2)),
        }
    }
}

/// Sign of `a.x(y) - b.x(y)`, both segments evaluated (or extrapolated) at
/// height `y`.
fn horizontal_order(a: &ConnectorLine, b: &ConnectorLine, y: i64) -> Ordering {
    let lhs = a.numerator_at(y) * i128::from(b.dy());
    let rhs = b.numerator_at(y) * i128::from(a.dy());
    lhs.cmp(&rhs)
}

// ─── Crossing test ───────────────────────────────────────────────────────────

/// Whether two connectors visually cross.
///
/// - identical segments cross;
/// - segments without a shared open vertical extent never cross;
/// - segments touching at one endpoint cross unless they have the same slope;
/// - otherwise they cross when their horizontal order at the top of the
///   shared band differs from the order at its bottom, a tie at either end
///   counting as a crossing.
///
/// The result is symmetric in its arguments.
pub fn crosses(a: &ConnectorLine, b: &ConnectorLine) -> bool {
    if a == b {
        return true;
    }
    if a.y2 <= b.y1 || b.y2 <= a.y1 {
        return false;
    }
    if a.shares_endpoint(b) {
        return !a.has_same_slope(b);
    }

    let (top, bottom) = Overlap::classify(a, b).band(a, b);
    let at_top = horizontal_order(a, b, top);
    let at_bottom = horizontal_order(a, b, bottom);

    at_top == Ordering::Equal || at_bottom == Ordering::Equal || at_top != at_bottom
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_geometry.rs"]
mod tests;
