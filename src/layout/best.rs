//! Shared best-layout cell for search workers.
//!
//! Snapshots are appended to a lock-free, append-only `boxcar::Vec` and never
//! moved or dropped while the cell lives, so a shared reference to any of them
//! stays valid. The current best is a single `AtomicU64` packing a version
//! stamp (high half) with a snapshot index (low half); publishing is a
//! compare-and-exchange on that word, retried whenever another worker got in
//! first.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use super::types::Metrics;
use crate::error::{Error, Result};

/// A complete placement and its score.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub metrics: Metrics,
    /// One x-coordinate per frame module index.
    pub xs: Vec<i64>,
}

pub(crate) struct BestCell {
    snapshots: boxcar::Vec<Snapshot>,
    current: AtomicU64,
}

fn pack(version: u32, index: u32) -> u64 {
    (u64::from(version) << 32) | u64::from(index)
}

fn unpack(word: u64) -> (u32, u32) {
    ((word >> 32) as u32, word as u32)
}

impl BestCell {
    pub fn new(initial: Snapshot) -> Result<Self> {
        let snapshots = boxcar::Vec::new();
        let index = to_index(snapshots.push(initial))?;
        Ok(Self {
            snapshots,
            current: AtomicU64::new(pack(0, index)),
        })
    }

    fn snapshot(&self, index: u32) -> Result<&Snapshot> {
        self.snapshots
            .get(index as usize)
            .ok_or_else(|| Error::InternalConsistency(format!("best snapshot {index} is missing")))
    }

    /// Current version stamp and best snapshot.
    pub fn load(&self) -> Result<(u32, &Snapshot)> {
        let (version, index) = unpack(self.current.load(Ordering::Acquire));
        Ok((version, self.snapshot(index)?))
    }

    pub fn metrics(&self) -> Result<Metrics> {
        Ok(self.load()?.1.metrics)
    }

    /// Publish `metrics`/`xs` if it beats the current best. Returns whether it
    /// was published. A candidate that loses a race is re-compared against
    /// the newer best before retrying.
    pub fn offer(&self, metrics: Metrics, xs: &[i64]) -> Result<bool> {
        let mut staged: Option<u32> = None;

        loop {
            let word = self.current.load(Ordering::Acquire);
            let (version, index) = unpack(word);
            if !metrics.is_better_than(&self.snapshot(index)?.metrics) {
                return Ok(false);
            }

            let candidate = match staged {
                Some(candidate) => candidate,
                None => {
                    let pushed = self.snapshots.push(Snapshot {
                        metrics,
                        xs: xs.to_vec(),
                    });
                    let candidate = to_index(pushed)?;
                    staged = Some(candidate);
                    candidate
                }
            };

            let next = pack(version.wrapping_add(1), candidate);
            if self
                .current
                .compare_exchange(word, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                debug!(%metrics, version = version.wrapping_add(1), "new best layout");
                return Ok(true);
            }
        }
    }
}

fn to_index(index: usize) -> Result<u32> {
    u32::try_from(index)
        .map_err(|_| Error::InternalConsistency(format!("too many best snapshots ({index})")))
}
