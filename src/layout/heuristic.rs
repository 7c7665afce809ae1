//! Initial placement and the one-to-one chain straightening pass.

use super::frame::Frame;

/// Every level left-aligned, modules in level iteration order.
pub(crate) fn initial_placement(frame: &Frame<'_>) -> Vec<i64> {
    let mut xs = vec![0; frame.len()];
    for members in &frame.levels {
        for (slot, &module) in members.iter().enumerate() {
            xs[module] = frame.config.slot_x(slot);
        }
    }
    xs
}

/// Straighten 1:1 chains.
///
/// A module whose only direct upstream has no other direct downstream is
/// moved into the column right below that upstream, swapping places with
/// whichever module of its own level sits there. The scan restarts after
/// every swap and ends once a full scan swaps nothing. Returns the number of
/// swaps made.
///
/// A swapped module stays under its upstream for the rest of the pass, so
/// there is at most one swap per module.
pub(crate) fn straighten_chains(frame: &Frame<'_>, xs: &mut [i64]) -> usize {
    let mut swaps = 0;
    let mut dirty = true;

    while dirty {
        dirty = false;
        for module in 0..frame.len() {
            let &[upstream] = frame.upstreams[module].as_slice() else {
                continue;
            };
            if frame.downstream_count[upstream] != 1 {
                continue;
            }

            let column = xs[upstream];
            let occupant = frame.levels[frame.level_of[module]]
                .iter()
                .copied()
                .find(|&other| xs[other] == column);

            match occupant {
                Some(other) if other != module => {
                    xs.swap(module, other);
                    swaps += 1;
                    dirty = true;
                    break;
                }
                _ => {}
            }
        }
    }
    swaps
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_heuristic.rs"]
mod tests;
