//! Layout configuration.

use std::time::Duration;

/// How far the layout optimiser may go beyond the local heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Optimize {
    /// Heuristic placement only.
    Off,
    /// Branch-and-bound search, abandoned once the wall-clock budget runs out.
    /// A zero budget is the same as `Off`.
    Deadline(Duration),
    /// Exhaustive branch-and-bound search.
    #[default]
    Unlimited,
}

impl Optimize {
    /// Map a caller-supplied millisecond deadline: absent or negative means
    /// an exhaustive search.
    pub fn from_deadline_ms(ms: Option<i64>) -> Self {
        match ms {
            Some(ms) if ms >= 0 => Optimize::Deadline(Duration::from_millis(ms as u64)),
            _ => Optimize::Unlimited,
        }
    }

    /// True when the search phase should run at all.
    pub fn searches(&self) -> bool {
        match self {
            Optimize::Off => false,
            Optimize::Deadline(budget) => !budget.is_zero(),
            Optimize::Unlimited => true,
        }
    }
}

/// Geometry and search settings for the layout pipeline.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Width of every module box.
    pub module_width: i64,
    /// Height of every module box.
    pub module_height: i64,
    /// Horizontal space between two neighbouring slots.
    pub horizontal_gap: i64,
    /// Vertical space between two levels.
    pub vertical_gap: i64,
    /// Offset of the first slot and the first level from the diagram origin.
    pub margin: i64,
    pub optimize: Optimize,
    /// Number of search workers. Values above one partition the first
    /// top-level slot choices across a thread pool.
    pub workers: usize,
    /// Minimum delay between two search progress reports.
    pub progress_interval: Duration,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            module_width: 150,
            module_height: 20,
            horizontal_gap: 10,
            vertical_gap: 40,
            margin: 10,
            optimize: Optimize::Unlimited,
            workers: 1,
            progress_interval: Duration::from_secs(4),
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_optimize(mut self, optimize: Optimize) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Horizontal distance between the left edges of two neighbouring slots.
    pub fn slot_pitch(&self) -> i64 {
        self.module_width + self.horizontal_gap
    }

    /// Vertical distance between the top edges of two neighbouring levels.
    pub fn level_pitch(&self) -> i64 {
        self.module_height + self.vertical_gap
    }

    /// Left edge of the box placed in `slot`.
    pub fn slot_x(&self, slot: usize) -> i64 {
        self.margin + slot as i64 * self.slot_pitch()
    }

    /// Top edge of the boxes on `level`.
    pub fn level_y(&self, level: usize) -> i64 {
        self.margin + level as i64 * self.level_pitch()
    }
}
