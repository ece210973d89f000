//! Property-based tests for the conformance pipeline.
//!
//! Schedules use synthetic identifiers `FrameId::from_parts(slot, 1)` with
//! slot = schedule index, so traces can be generated directly as index runs.

use proptest::prelude::*;

use gttcan_conformance::{align, analyze, segment, AnalysisError, AnalysisOptions, BoundaryRule};
use gttcan_schedule::{FrameId, Observation, ReferenceSchedule};

fn schedule(size: usize) -> ReferenceSchedule {
    ReferenceSchedule::new((0..size).map(|i| FrameId::from_parts(i as u16, 1)).collect()).unwrap()
}

fn trace(indices: &[usize]) -> Vec<Observation> {
    indices
        .iter()
        .enumerate()
        .map(|(i, &k)| Observation::new(FrameId::from_parts(k as u16, 1), i + 1))
        .collect()
}

fn boundary_rule() -> impl Strategy<Value = BoundaryRule> {
    prop_oneof![Just(BoundaryRule::AnyDecrease), Just(BoundaryRule::NearestWrap)]
}

/// A schedule size together with a random index walk over it.
fn size_and_walk() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..24).prop_flat_map(|size| (Just(size), prop::collection::vec(0..size, 1..200)))
}

// =============================================================================
// Schedule lookup
// =============================================================================

proptest! {
    /// index_of maps the i-th entry back to i for any distinct identifiers.
    #[test]
    fn prop_index_of_inverts_entries(ids in prop::collection::hash_set(any::<u32>(), 1..64)) {
        let entries: Vec<FrameId> = ids.into_iter().map(FrameId).collect();
        let schedule = ReferenceSchedule::new(entries.clone()).unwrap();
        for (i, &id) in entries.iter().enumerate() {
            prop_assert_eq!(schedule.index_of(id), Some(i));
        }
    }
}

// =============================================================================
// Segmentation and classification
// =============================================================================

proptest! {
    /// A framed replay of k clean cycles yields exactly k clean cycles.
    #[test]
    fn prop_clean_replay(
        (size, lead, tail) in (2usize..40).prop_flat_map(|n| (Just(n), 1..n, 1..n)),
        k in 1usize..6,
        rule in boundary_rule(),
    ) {
        let mut indices: Vec<usize> = (lead..size).collect();
        for _ in 0..k {
            indices.extend(0..size);
        }
        indices.extend(0..tail);

        let options = AnalysisOptions { boundary: rule };
        let report = analyze(&schedule(size), &trace(&indices), &options).unwrap();
        prop_assert_eq!(report.completed_cycles, k);
        prop_assert!(report.trimmed);
        prop_assert!(report.is_clean());
        prop_assert_eq!(report.presence_percent, 100.0);
    }

    /// Dropping one contiguous run of frames (shorter than N - 2) from a
    /// clean replay never shows up as reordering or repetition.
    #[test]
    fn prop_dropped_run_is_never_reordering(
        (size, lead, tail) in (4usize..30).prop_flat_map(|n| (Just(n), 1..n, 1..n)),
        k in 1usize..5,
        cut in any::<prop::sample::Index>(),
        run_len in any::<prop::sample::Index>(),
    ) {
        let mut indices: Vec<usize> = (lead..size).collect();
        for _ in 0..k {
            indices.extend(0..size);
        }
        indices.extend(0..tail);

        let len = 1 + run_len.index(size - 3);
        let start = cut.index(indices.len());
        let end = (start + len).min(indices.len());
        indices.drain(start..end);

        let report = analyze(&schedule(size), &trace(&indices), &AnalysisOptions::default())
            .unwrap();
        prop_assert_eq!(report.total_out_of_order, 0);
        prop_assert_eq!(report.total_duplicates, 0);
        prop_assert!(report.presence_percent <= 100.0);
    }

    /// Cycles are non-empty and cover the retained span exactly once.
    #[test]
    fn prop_cycles_partition_retained_span((size, walk) in size_and_walk(), rule in boundary_rule()) {
        let schedule = schedule(size);
        let aligned = align(&schedule, &trace(&walk)).unwrap();
        let seg = segment(&aligned, rule, size);

        prop_assert!(seg.cycles.iter().all(|c| !c.is_empty()));
        let positions: Vec<usize> = seg
            .cycles
            .iter()
            .flat_map(|c| c.observations().iter().map(|o| o.position))
            .collect();
        prop_assert_eq!(positions.len(), seg.retained());
        prop_assert!(positions.windows(2).all(|w| w[1] == w[0] + 1));
        if !seg.trimmed {
            prop_assert_eq!(seg.retained(), aligned.len());
        }
    }

    /// Every transition inside a cycle is accounted for exactly once.
    #[test]
    fn prop_transitions_accounted((size, walk) in size_and_walk(), rule in boundary_rule()) {
        let options = AnalysisOptions { boundary: rule };
        let report = analyze(&schedule(size), &trace(&walk), &options).unwrap();
        for cycle in &report.cycles {
            let anomalous = cycle.missing.positions.len()
                + cycle.duplicates.positions.len()
                + cycle.out_of_order.positions.len();
            prop_assert!(anomalous < cycle.observations);
            prop_assert!(cycle.missing.count >= cycle.missing.positions.len());
            prop_assert!(cycle.missing.count <= (size - 1) * cycle.observations);
        }
        let summed: usize = report.cycles.iter().map(|c| c.missing.count).sum();
        prop_assert_eq!(summed, report.total_missing);
    }

    /// Literal boundaries never leave a backward step inside a cycle.
    #[test]
    fn prop_any_decrease_has_no_out_of_order((size, walk) in size_and_walk()) {
        let options = AnalysisOptions { boundary: BoundaryRule::AnyDecrease };
        let report = analyze(&schedule(size), &trace(&walk), &options).unwrap();
        prop_assert_eq!(report.total_out_of_order, 0);
    }

    /// The pipeline is a pure function of its input.
    #[test]
    fn prop_analysis_is_deterministic((size, walk) in size_and_walk(), rule in boundary_rule()) {
        let schedule = schedule(size);
        let trace = trace(&walk);
        let options = AnalysisOptions { boundary: rule };
        prop_assert_eq!(
            analyze(&schedule, &trace, &options),
            analyze(&schedule, &trace, &options)
        );
    }
}

// =============================================================================
// Degenerate inputs
// =============================================================================

proptest! {
    /// With a single-frame schedule every repeat is a duplicate.
    #[test]
    fn prop_single_frame_schedule(repeats in 1usize..100) {
        let report = analyze(&schedule(1), &trace(&vec![0; repeats]), &AnalysisOptions::default())
            .unwrap();
        prop_assert_eq!(report.completed_cycles, 1);
        prop_assert_eq!(report.total_duplicates, repeats - 1);
        prop_assert_eq!(report.total_missing, 0);
        prop_assert_eq!(report.total_out_of_order, 0);
        prop_assert!(report.presence_percent.is_finite());
    }

    /// Identifiers outside the schedule never produce a report.
    #[test]
    fn prop_foreign_trace_is_no_overlap(slots in prop::collection::vec(100u16..200, 0..50)) {
        let observations: Vec<Observation> = slots
            .iter()
            .enumerate()
            .map(|(i, &slot)| Observation::new(FrameId::from_parts(slot, 1), i + 1))
            .collect();
        prop_assert_eq!(
            analyze(&schedule(8), &observations, &AnalysisOptions::default()),
            Err(AnalysisError::NoOverlap { ingested: slots.len() })
        );
    }
}
