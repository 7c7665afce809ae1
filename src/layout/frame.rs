//! The graph flattened into index tables for the placement phases.
//!
//! Modules are numbered level by level; a placement is then just one
//! x-coordinate per module index, since a module's y is fixed by its level.

use std::collections::HashMap;

use super::geometry::ConnectorLine;
use super::metrics::measure;
use super::types::{BoxGeometry, Metrics, Position};
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::graph::DependencyGraph;

pub(crate) struct Frame<'a> {
    pub config: &'a LayoutConfig,
    pub names: Vec<&'a str>,
    pub level_of: Vec<usize>,
    /// Module indices per level, in level iteration order.
    pub levels: Vec<Vec<usize>>,
    /// Direct upstream indices per module.
    pub upstreams: Vec<Vec<usize>>,
    pub downstream_count: Vec<usize>,
    /// Horizontal slots on every level.
    pub slot_count: usize,
}

impl<'a> Frame<'a> {
    pub fn new(graph: &'a DependencyGraph, config: &'a LayoutConfig) -> Self {
        let mut names: Vec<&'a str> = Vec::with_capacity(graph.len());
        let mut level_of = Vec::with_capacity(graph.len());
        let mut levels = Vec::with_capacity(graph.level_count());

        for (number, level) in graph.levels().iter().enumerate() {
            let mut members = Vec::with_capacity(level.len());
            for name in level {
                members.push(names.len());
                names.push(name.as_str());
                level_of.push(number);
            }
            levels.push(members);
        }

        let index: HashMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();
        let upstreams = names
            .iter()
            .map(|n| {
                graph
                    .direct_upstreams(n)
                    .iter()
                    .filter_map(|up| index.get(up.as_str()).copied())
                    .collect()
            })
            .collect();
        let downstream_count = names.iter().map(|n| graph.direct_downstreams(n).len()).collect();

        Self {
            config,
            names,
            level_of,
            levels,
            upstreams,
            downstream_count,
            slot_count: slot_count(graph.max_level_width()),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn y_of(&self, module: usize) -> i64 {
        self.config.level_y(self.level_of[module])
    }

    /// Connectors between every placed module and each of its placed direct
    /// upstreams.
    pub fn lines_with(&self, x_of: impl Fn(usize) -> Option<i64>) -> Result<Vec<ConnectorLine>> {
        let mut lines = Vec::new();
        for (module, ups) in self.upstreams.iter().enumerate() {
            let Some(x) = x_of(module) else {
                continue;
            };
            let from = self.box_at(module, x);
            for &up in ups {
                let Some(up_x) = x_of(up) else {
                    continue;
                };
                lines.push(from.connector_to(&self.box_at(up, up_x))?);
            }
        }
        Ok(lines)
    }

    fn box_at(&self, module: usize, x: i64) -> BoxGeometry {
        BoxGeometry {
            x,
            y: self.y_of(module),
            width: self.config.module_width,
            height: self.config.module_height,
        }
    }

    pub fn lines(&self, xs: &[i64]) -> Result<Vec<ConnectorLine>> {
        self.lines_with(|m| Some(xs[m]))
    }

    pub fn measure(&self, xs: &[i64]) -> Result<Metrics> {
        measure(&self.lines(xs)?)
    }

    pub fn measure_partial(&self, xs: &[Option<i64>]) -> Result<Metrics> {
        measure(&self.lines_with(|m| xs[m])?)
    }

    /// Positions sorted by level, then left to right.
    pub fn positions(&self, xs: &[i64]) -> Vec<Position> {
        let mut positions: Vec<Position> = (0..self.len())
            .map(|m| {
                Position::new(
                    self.names[m],
                    xs[m],
                    self.y_of(m),
                    self.config.module_width,
                    self.config.module_height,
                )
            })
            .collect();
        positions.sort_by_key(|p| (p.y, p.x));
        positions
    }

    pub fn diagram_size(&self) -> (i64, i64) {
        let c = self.config;
        let width = c.margin + self.slot_count as i64 * c.slot_pitch();
        let level_count = self.levels.len() as i64;
        let height = if level_count == 0 {
            2 * c.margin
        } else {
            2 * c.margin + level_count * c.module_height + (level_count - 1) * c.vertical_gap
        };
        (width, height)
    }
}

/// Slots per level: the widest level, plus one spare slot when that level
/// holds at most three modules so sparse levels have room to shift.
pub fn slot_count(max_level_width: usize) -> usize {
    let widest = max_level_width.max(1);
    if widest <= 3 { widest + 1 } else { widest }
}
