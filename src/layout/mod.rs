//! Dependency diagram layout.
//!
//! Phases:
//!   1. Initial placement (every level left-aligned)
//!   2. Chain straightening (1:1 chains pulled into one column)
//!   3. Metrics (crossings, then slope)
//!   4. Branch-and-bound search over slot assignments, if enabled

mod best;
mod frame;
pub mod geometry;
mod heuristic;
pub mod metrics;
mod search;
pub mod types;

use tracing::info;

pub use geometry::{ConnectorLine, crosses};
pub use types::{LayoutResult, Metrics, Placement, Position, SearchReport};

use self::best::Snapshot;
use self::frame::Frame;
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::graph::DependencyGraph;

/// Lay out a validated graph.
///
/// Never fails on a graph that passed construction; errors here are internal
/// consistency failures.
pub fn layout(graph: &DependencyGraph, config: &LayoutConfig) -> Result<LayoutResult> {
    let frame = Frame::new(graph, config);

    let mut xs = heuristic::initial_placement(&frame);
    let swaps = heuristic::straighten_chains(&frame, &mut xs);
    let metrics = frame.measure(&xs)?;
    info!(%metrics, swaps, "heuristic layout");

    let (best, placement, search) = if config.optimize.searches() {
        let outcome = search::search(&frame, Snapshot { metrics, xs })?;
        let placement = if outcome.improved {
            Placement::OptimizedPlaced
        } else {
            Placement::HeuristicPlaced
        };
        (outcome.best, placement, Some(outcome.report))
    } else {
        (Snapshot { metrics, xs }, Placement::HeuristicPlaced, None)
    };

    let (width, height) = frame.diagram_size();
    Ok(LayoutResult {
        positions: frame.positions(&best.xs),
        lines: frame.lines(&best.xs)?,
        metrics: best.metrics,
        placement,
        slot_count: frame.slot_count,
        width,
        height,
        search,
    })
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout.rs"]
mod tests;
