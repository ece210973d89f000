//! Error types for schedule construction and source loading.

use std::path::PathBuf;

use crate::model::FrameId;

/// A reference schedule could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// The schedule has no entries, so there is no cycle to check against.
    #[error("reference schedule is empty")]
    Empty,
    /// Two entries share an identifier; index lookup would be ambiguous.
    #[error("frame id {id} appears at schedule index {first} and again at {second}")]
    DuplicateEntry {
        /// The repeated identifier.
        id: FrameId,
        /// Index of the first occurrence.
        first: usize,
        /// Index of the repeated occurrence.
        second: usize,
    },
}

/// A schedule source or trace source could not be read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The schedule source contained no `{ node, slot, data }` initialisers.
    #[error("no {{node_id, slot_id, data_id}} entries found in schedule source")]
    NoEntries,
    /// A numeric literal did not fit the field it was assigned to.
    #[error("invalid {field} literal `{token}`")]
    InvalidLiteral {
        /// Field being parsed (`node_id`, `slot_id`, `data_id`).
        field: &'static str,
        /// The offending source token.
        token: String,
    },
    /// A built-in pattern failed to compile.
    #[error("pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),
    /// An input file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path of the file being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
