//! Branch-and-bound search over slot assignments.
//!
//! Levels are filled top to bottom and slots left to right. At each slot a
//! worker tries every module of the level not placed yet, then an empty slot
//! if the level still has gaps to spare. A branch is pruned once the
//! connectors already fixed cross more often than the best known layout:
//! adding connectors never removes a crossing.
//!
//! Workers share nothing but the [`BestCell`]; each one owns its grid, its
//! partial placement and its progress counters.

use std::time::Duration;

use tracing::{debug, info};
#[cfg(not(target_arch = "wasm32"))]
use tracing::warn;
use web_time::Instant;

use super::best::{BestCell, Snapshot};
use super::frame::Frame;
use super::types::SearchReport;
use crate::config::Optimize;
use crate::error::{Error, Result};

/// A slot decision: a module index, or `None` for an empty slot.
type Choice = Option<usize>;

pub(crate) struct Outcome {
    pub best: Snapshot,
    pub report: SearchReport,
    /// True when the search published something better than its seed.
    pub improved: bool,
}

/// Search for a layout better than `initial`, honouring the configured
/// deadline and worker count.
pub(crate) fn search(frame: &Frame<'_>, initial: Snapshot) -> Result<Outcome> {
    let config = frame.config;
    let deadline = match config.optimize {
        Optimize::Deadline(budget) => Instant::now().checked_add(budget),
        Optimize::Off | Optimize::Unlimited => None,
    };

    let space = SearchSpace {
        frame,
        best: BestCell::new(initial)?,
        deadline,
        progress_interval: config.progress_interval,
    };

    let report = if config.workers > 1 && !frame.levels.is_empty() {
        space.run_parallel(config.workers)?
    } else {
        space.run_sequential()?
    };

    let (version, best) = space.best.load()?;
    let best = best.clone();
    info!(
        metrics = %best.metrics,
        visited = report.visited,
        completed = report.completed,
        "search finished"
    );

    Ok(Outcome {
        best,
        report,
        improved: version > 0,
    })
}

// ─── Search space ────────────────────────────────────────────────────────────

struct SearchSpace<'s, 'a> {
    frame: &'s Frame<'a>,
    best: BestCell,
    deadline: Option<Instant>,
    progress_interval: Duration,
}

impl SearchSpace<'_, '_> {
    fn run_sequential(&self) -> Result<SearchReport> {
        let mut worker = Worker::new(self);
        worker.descend(0, 0)?;
        Ok(worker.report())
    }

    /// Split the choices for the first slot of the first level over a thread
    /// pool; every subtree is then searched depth-first by its own worker.
    #[cfg(not(target_arch = "wasm32"))]
    fn run_parallel(&self, workers: usize) -> Result<SearchReport> {
        use rayon::prelude::*;

        let pool = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool,
            Err(err) => {
                warn!(%err, "cannot start search workers, searching sequentially");
                return self.run_sequential();
            }
        };

        let mut root = Worker::new(self);
        if !root.tick() {
            return Ok(root.report());
        }
        let choices = root.options(0, 0);
        debug!(subtrees = choices.len(), workers, "parallel search");

        let reports: Vec<Result<SearchReport>> = pool.install(|| {
            choices
                .into_par_iter()
                .map(|choice| {
                    let mut worker = Worker::new(self);
                    worker.place(0, 0, choice);
                    worker.descend(0, 1)?;
                    Ok(worker.report())
                })
                .collect()
        });

        let mut total = root.report();
        for report in reports {
            let report = report?;
            total.visited += report.visited;
            total.completed &= report.completed;
        }
        Ok(total)
    }

    /// No thread pool on wasm32; the subtrees are searched in turn.
    #[cfg(target_arch = "wasm32")]
    fn run_parallel(&self, workers: usize) -> Result<SearchReport> {
        debug!(workers, "parallel search unavailable, searching sequentially");
        self.run_sequential()
    }
}

// ─── Worker ──────────────────────────────────────────────────────────────────

struct Worker<'w> {
    space: &'w SearchSpace<'w, 'w>,
    /// `grid[level][slot]`
    grid: Vec<Vec<Choice>>,
    /// x of every module placed so far.
    xs: Vec<Option<i64>>,
    visited: u64,
    timed_out: bool,
    next_report: Option<Instant>,
}

impl<'w> Worker<'w> {
    fn new(space: &'w SearchSpace<'w, 'w>) -> Self {
        let frame = space.frame;
        Self {
            space,
            grid: vec![vec![None; frame.slot_count]; frame.levels.len()],
            xs: vec![None; frame.len()],
            visited: 0,
            timed_out: false,
            next_report: Instant::now().checked_add(space.progress_interval),
        }
    }

    fn report(&self) -> SearchReport {
        SearchReport {
            visited: self.visited,
            completed: !self.timed_out,
        }
    }

    /// Count a visited node. Returns false once the deadline has passed.
    fn tick(&mut self) -> bool {
        self.visited += 1;
        if self.timed_out {
            return false;
        }

        let now = Instant::now();
        if self.space.deadline.is_some_and(|deadline| now >= deadline) {
            self.timed_out = true;
            debug!(visited = self.visited, "search deadline reached");
            return false;
        }

        if self.next_report.is_some_and(|next| now >= next) {
            match self.space.best.metrics() {
                Ok(best) => debug!(visited = self.visited, %best, "searching"),
                Err(_) => debug!(visited = self.visited, "searching"),
            }
            self.next_report = now.checked_add(self.space.progress_interval);
        }
        true
    }

    /// Still-unplaced modules of `level` in index order, then a gap if the
    /// level can afford another empty slot.
    fn options(&self, level: usize, slot: usize) -> Vec<Choice> {
        let frame = self.space.frame;
        let members = &frame.levels[level];
        let taken = &self.grid[level][..slot];

        let mut options: Vec<Choice> = members
            .iter()
            .copied()
            .filter(|&module| !taken.contains(&Some(module)))
            .map(Some)
            .collect();

        let gaps = taken.iter().filter(|choice| choice.is_none()).count();
        if gaps < frame.slot_count.saturating_sub(members.len()) {
            options.push(None);
        }
        options
    }

    fn place(&mut self, level: usize, slot: usize, choice: Choice) {
        if let Some(previous) = self.grid[level][slot].take() {
            self.xs[previous] = None;
        }
        if let Some(module) = choice {
            self.xs[module] = Some(self.space.frame.config.slot_x(slot));
        }
        self.grid[level][slot] = choice;
    }

    fn descend(&mut self, level: usize, slot: usize) -> Result<()> {
        let frame = self.space.frame;
        let level_count = frame.levels.len();

        if level < level_count && slot >= frame.slot_count {
            return self.descend(level + 1, 0);
        }
        if !self.tick() {
            return Ok(());
        }

        let partial = frame.measure_partial(&self.xs)?;

        if level >= level_count {
            let xs = self.xs.iter().copied().collect::<Option<Vec<i64>>>().ok_or_else(|| {
                Error::InternalConsistency("search reached a leaf with unplaced modules".into())
            })?;
            self.space.best.offer(partial, &xs)?;
            return Ok(());
        }

        if self.space.best.metrics()?.crossing_count < partial.crossing_count {
            return Ok(());
        }

        for choice in self.options(level, slot) {
            if self.timed_out {
                break;
            }
            self.place(level, slot, choice);
            self.descend(level, slot + 1)?;
            self.place(level, slot, None);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_search.rs"]
mod tests;
