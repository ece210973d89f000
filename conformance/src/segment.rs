//! Cycle segmentation.
//!
//! A boundary sits between two consecutive aligned observations when the
//! stream wrapped from the end of one cycle to the start of the next. The
//! scan keeps the same cursor as the classifier (the highest index since the
//! last boundary), and a step behind the cursor is the only candidate for a
//! boundary. The first and last cycles of a capture are usually partial, so
//! when at least two boundaries exist the sequence is trimmed to the span
//! `[first boundary, last boundary)` before being split into cycles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::AlignedObservation;
use crate::error::AnalysisError;

/// Which index decreases count as cycle boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryRule {
    /// Every decrease is a wrap into a new cycle.
    AnyDecrease,
    /// A step behind the cursor is a wrap unless it is short (less than half
    /// the schedule back) and the next observation returns to or past the
    /// cursor. Only that confirmed excursion stays in the cycle and is
    /// classified as out-of-order.
    #[default]
    NearestWrap,
}

impl BoundaryRule {
    /// Returns true if observation index `curr` starts a new cycle, given the
    /// highest index `cursor` seen since the last boundary, the index `next`
    /// of the following observation (if any) and a schedule of `size` frames.
    #[must_use]
    pub fn is_boundary(self, cursor: usize, curr: usize, next: Option<usize>, size: usize) -> bool {
        if curr >= cursor {
            return false;
        }
        match self {
            BoundaryRule::AnyDecrease => true,
            BoundaryRule::NearestWrap => {
                2 * (cursor - curr) >= size || !next.is_some_and(|n| n >= cursor)
            }
        }
    }

    /// Name used in configuration files and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryRule::AnyDecrease => "any-decrease",
            BoundaryRule::NearestWrap => "nearest-wrap",
        }
    }
}

impl fmt::Display for BoundaryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryRule {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any-decrease" => Ok(BoundaryRule::AnyDecrease),
            "nearest-wrap" => Ok(BoundaryRule::NearestWrap),
            other => Err(AnalysisError::UnknownBoundaryRule(other.to_string())),
        }
    }
}

/// One pass through the schedule: a non-empty run of aligned observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle<'a> {
    observations: &'a [AlignedObservation],
}

impl<'a> Cycle<'a> {
    /// Observations of the cycle in trace order.
    #[must_use]
    pub fn observations(&self) -> &'a [AlignedObservation] {
        self.observations
    }

    /// Number of observations in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false for cycles produced by [`segment`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Trace line of the first observation.
    #[must_use]
    pub fn first_position(&self) -> Option<usize> {
        self.observations.first().map(|o| o.position)
    }

    /// Trace line of the last observation.
    #[must_use]
    pub fn last_position(&self) -> Option<usize> {
        self.observations.last().map(|o| o.position)
    }
}

/// The cycles found in an aligned trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation<'a> {
    /// Cycles in trace order, covering the retained span exactly once.
    pub cycles: Vec<Cycle<'a>>,
    /// Whether leading/trailing partial cycles were trimmed away. False
    /// means fewer than two boundaries existed and the cycles may be partial.
    pub trimmed: bool,
}

impl Segmentation<'_> {
    /// Number of observations kept after trimming.
    #[must_use]
    pub fn retained(&self) -> usize {
        self.cycles.iter().map(Cycle::len).sum()
    }
}

/// Indices `i` such that a boundary lies between `aligned[i - 1]` and `aligned[i]`.
#[must_use]
pub fn boundaries(aligned: &[AlignedObservation], rule: BoundaryRule, size: usize) -> Vec<usize> {
    let mut found = Vec::new();
    let Some(head) = aligned.first() else {
        return found;
    };
    let mut cursor = head.schedule_index;
    for (i, obs) in aligned.iter().enumerate().skip(1) {
        let curr = obs.schedule_index;
        let next = aligned.get(i + 1).map(|o| o.schedule_index);
        if rule.is_boundary(cursor, curr, next, size) {
            found.push(i);
            cursor = curr;
        } else {
            cursor = cursor.max(curr);
        }
    }
    found
}

/// Trims partial edge cycles and splits the remainder into cycles.
///
/// Boundaries are found once over the whole sequence, so the lookahead at
/// the trimmed edges sees the same neighbours as the untrimmed scan.
#[must_use]
pub fn segment(aligned: &[AlignedObservation], rule: BoundaryRule, size: usize) -> Segmentation<'_> {
    let found = boundaries(aligned, rule, size);
    let trimmed = found.len() >= 2;
    let cuts: Vec<usize> = if trimmed {
        found.clone()
    } else {
        std::iter::once(0)
            .chain(found.iter().copied())
            .chain(std::iter::once(aligned.len()))
            .collect()
    };

    let cycles: Vec<Cycle<'_>> = cuts
        .windows(2)
        .filter(|w| w[0] < w[1])
        .map(|w| Cycle {
            observations: &aligned[w[0]..w[1]],
        })
        .collect();

    let segmentation = Segmentation { cycles, trimmed };
    debug!(
        boundaries = found.len(),
        trimmed,
        cycles = segmentation.cycles.len(),
        retained = segmentation.retained(),
        "segmented trace into cycles"
    );
    segmentation
}
