//! Sequence alignment: maps observed identifiers onto schedule positions.

use gttcan_schedule::{Observation, ReferenceSchedule};
use serde::Serialize;
use tracing::debug;

use crate::error::AnalysisError;

/// An observation whose identifier was found in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignedObservation {
    /// Index of the identifier in the reference schedule.
    pub schedule_index: usize,
    /// 1-based trace line of the source observation.
    pub position: usize,
}

/// Aligns observations to the schedule, dropping unscheduled identifiers.
///
/// Trace order is preserved.
///
/// # Errors
///
/// Returns [`AnalysisError::NoOverlap`] if no observation is scheduled.
pub fn align(
    schedule: &ReferenceSchedule,
    observations: &[Observation],
) -> Result<Vec<AlignedObservation>, AnalysisError> {
    let aligned: Vec<AlignedObservation> = observations
        .iter()
        .filter_map(|obs| {
            schedule
                .index_of(obs.identifier)
                .map(|schedule_index| AlignedObservation {
                    schedule_index,
                    position: obs.position,
                })
        })
        .collect();

    if aligned.is_empty() {
        return Err(AnalysisError::NoOverlap {
            ingested: observations.len(),
        });
    }

    debug!(
        aligned = aligned.len(),
        dropped = observations.len() - aligned.len(),
        "aligned trace to schedule"
    );
    Ok(aligned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gttcan_schedule::FrameId;

    #[test]
    fn drops_unscheduled_and_keeps_order() {
        let schedule =
            ReferenceSchedule::new(vec![FrameId(0xa), FrameId(0xb), FrameId(0xc)]).unwrap();
        let observations = vec![
            Observation::new(FrameId(0xc), 3),
            Observation::new(FrameId(0x99), 4),
            Observation::new(FrameId(0xa), 7),
            Observation::new(FrameId(0xb), 8),
        ];
        let aligned = align(&schedule, &observations).unwrap();
        assert_eq!(
            aligned,
            vec![
                AlignedObservation {
                    schedule_index: 2,
                    position: 3
                },
                AlignedObservation {
                    schedule_index: 0,
                    position: 7
                },
                AlignedObservation {
                    schedule_index: 1,
                    position: 8
                },
            ]
        );
    }

    #[test]
    fn empty_trace_is_no_overlap() {
        let schedule = ReferenceSchedule::new(vec![FrameId(1)]).unwrap();
        assert_eq!(
            align(&schedule, &[]),
            Err(AnalysisError::NoOverlap { ingested: 0 })
        );
    }
}
