//! Anomaly classification of consecutive observations within a cycle.
//!
//! The classifier keeps a cursor: the highest schedule index accepted so far
//! in the cycle. Each observation is compared against the cursor rather than
//! against the literal previous observation:
//!
//! | Observed vs. cursor | Classification | Cursor |
//! |---------------------|----------------|--------|
//! | behind | out-of-order | unchanged |
//! | step 0 | duplicate | unchanged |
//! | step 1 | in-order | advances |
//! | step k ≥ 2 | k − 1 missing | advances |
//!
//! where `step = (observed − cursor) mod N`. The behind check runs first, so
//! a backward jump is never mistaken for a near-full cycle of missing frames,
//! and a single reordered frame does not make its successor look like a gap.

use serde::Serialize;

use crate::report::CycleReport;
use crate::segment::Cycle;

/// Classification of one observation relative to the classifier cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "frames")]
pub enum Transition {
    /// The next scheduled frame.
    InOrder,
    /// The same frame as the cursor again.
    Duplicate,
    /// The given number of scheduled frames were skipped.
    Missing(usize),
    /// A frame the cycle had already moved past.
    OutOfOrder,
}

impl Transition {
    /// Classifies `observed` against the cursor `expected` in a schedule of
    /// `size` frames. Both indices must be below `size`.
    #[must_use]
    pub fn between(expected: usize, observed: usize, size: usize) -> Self {
        if observed < expected {
            return Transition::OutOfOrder;
        }
        match (observed - expected) % size.max(1) {
            0 => Transition::Duplicate,
            1 => Transition::InOrder,
            step => Transition::Missing(step - 1),
        }
    }
}

/// Classifies every transition of `cycle`, numbered `number` (1-based).
#[must_use]
pub fn classify(cycle: &Cycle<'_>, number: usize, size: usize) -> CycleReport {
    let observations = cycle.observations();
    let mut report = CycleReport::new(
        number,
        cycle.first_position().unwrap_or(0),
        cycle.last_position().unwrap_or(0),
        observations.len(),
    );
    let Some((head, rest)) = observations.split_first() else {
        return report;
    };

    let mut cursor = head.schedule_index;
    for obs in rest {
        match Transition::between(cursor, obs.schedule_index, size) {
            Transition::InOrder => cursor = obs.schedule_index,
            Transition::Duplicate => report.duplicates.record(obs.position, 1),
            Transition::Missing(frames) => {
                report.missing.record(obs.position, frames);
                cursor = obs.schedule_index;
            }
            Transition::OutOfOrder => report.out_of_order.record(obs.position, 1),
        }
    }
    report
}
