//! G-TTCAN schedule conformance analysis.
//!
//! Checks that a captured trace of time-triggered CAN frames follows a
//! cyclically repeating reference schedule. The analysis is a pure pipeline
//! over already-loaded data:
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Sequence alignment | [`align`] | [`AlignedObservation`]s |
//! | Cycle segmentation | [`segment`] | [`Segmentation`] |
//! | Anomaly classification | [`classify`] | one [`CycleReport`] per cycle |
//! | Statistics aggregation | [`report`] | [`AggregateReport`] |
//!
//! Rendering lives in [`render`]; the set-based presence audit used by the
//! fetch workflow lives in [`presence`].
//!
//! # Entry Point
//!
//! ```
//! use gttcan_conformance::{analyze, AnalysisOptions};
//! use gttcan_schedule::{FrameId, Observation, ReferenceSchedule};
//!
//! let schedule = ReferenceSchedule::new(vec![FrameId(0x10), FrameId(0x20), FrameId(0x30)])?;
//! let trace: Vec<Observation> = [0x10, 0x20, 0x30, 0x10, 0x30]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &id)| Observation::new(FrameId(id), i + 1))
//!     .collect();
//!
//! let report = analyze(&schedule, &trace, &AnalysisOptions::default())?;
//! assert_eq!(report.completed_cycles, 2);
//! assert_eq!(report.total_missing, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod align;
pub mod classify;
pub mod error;
pub mod presence;
pub mod render;
pub mod report;
pub mod segment;

pub use align::{align, AlignedObservation};
pub use classify::{classify, Transition};
pub use error::AnalysisError;
pub use report::{aggregate, AggregateReport, Anomalies, CycleReport, StageCounts};
pub use segment::{segment, BoundaryRule, Cycle, Segmentation};

use gttcan_schedule::{Observation, ReferenceSchedule};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Tunable parts of the analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalysisOptions {
    /// Which index decreases count as cycle boundaries.
    pub boundary: BoundaryRule,
}

/// Runs the full pipeline: align, segment, classify every cycle, aggregate.
///
/// The result depends only on the arguments; repeated calls on the same
/// input produce equal reports.
///
/// # Errors
///
/// Returns [`AnalysisError::NoOverlap`] when no observation matches any
/// schedule entry.
pub fn analyze(
    schedule: &ReferenceSchedule,
    observations: &[Observation],
    options: &AnalysisOptions,
) -> Result<AggregateReport, AnalysisError> {
    let size = schedule.len();
    let aligned = align(schedule, observations)?;
    let segmentation = segment(&aligned, options.boundary, size);

    let cycles: Vec<CycleReport> = segmentation
        .cycles
        .iter()
        .enumerate()
        .map(|(i, cycle)| classify(cycle, i + 1, size))
        .collect();

    let counts = StageCounts {
        ingested: observations.len(),
        aligned: aligned.len(),
        retained: segmentation.retained(),
        trimmed: segmentation.trimmed,
    };
    let report = aggregate(size, counts, cycles);

    info!(
        cycles = report.completed_cycles,
        missing = report.total_missing,
        duplicates = report.total_duplicates,
        out_of_order = report.total_out_of_order,
        "schedule conformance analysed"
    );
    Ok(report)
}
