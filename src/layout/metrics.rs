//! Layout quality metrics.

use super::geometry::{ConnectorLine, crosses};
use super::types::Metrics;
use crate::error::{Error, Result};

/// Score a full connector set.
///
/// Every unordered pair is tested once in each direction; a disagreement
/// between the two answers means the crossing test is broken and aborts the
/// measurement.
pub fn measure(lines: &[ConnectorLine]) -> Result<Metrics> {
    let mut crossing_count = 0usize;
    let mut slope_score = 0i64;

    for (i, a) in lines.iter().enumerate() {
        slope_score += a.dx() * a.dx();

        for b in &lines[i + 1..] {
            let forward = crosses(a, b);
            if forward != crosses(b, a) {
                return Err(Error::InternalConsistency(format!(
                    "crossing test is asymmetric for {a} and {b}"
                )));
            }
            if forward {
                crossing_count += 1;
            }
        }
    }

    Ok(Metrics {
        crossing_count,
        slope_score,
        tie_break_weight: 0,
    })
}
