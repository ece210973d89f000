//! Analysis error conditions.

/// The analysis could not produce a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// None of the trace identifiers appear in the reference schedule.
    #[error("no overlap between trace and schedule: none of {ingested} observed frames is scheduled")]
    NoOverlap {
        /// Number of observations that were examined.
        ingested: usize,
    },
    /// A boundary rule name was not recognised.
    #[error("unknown boundary rule `{0}` (expected `any-decrease` or `nearest-wrap`)")]
    UnknownBoundaryRule(String),
}
