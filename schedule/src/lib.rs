//! G-TTCAN schedule model.
//!
//! The `gttcan-schedule` crate provides the leaf data of schedule conformance
//! checking: packed frame identifiers, the immutable [`ReferenceSchedule`]
//! that one bus cycle is expected to follow, and readers for the two input
//! sources: the C `global_schedule` initialiser and captured bus traces.
//!
//! # Entry Point
//!
//! ```
//! use gttcan_schedule::{DataIdMap, ReferenceSchedule, ScheduleSource, TraceReader};
//!
//! let source = ScheduleSource::new(DataIdMap::default())?;
//! let entries = source.parse_str(
//!     "{ 1, 0x00, REFERENCE_FRAME_DATA_ID }, { 2, 0x14, GENERIC_DATA_ID },",
//! )?;
//! let schedule = ReferenceSchedule::from_entries(&entries)?;
//! assert_eq!(schedule.len(), 2);
//!
//! let trace = TraceReader::new()?.parse_str("<0x00140001> [8] 02 00 00 00 00 00 00 01\n");
//! assert_eq!(schedule.index_of(trace[0].id), Some(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod model;
pub mod schedule;
pub mod source;
pub mod trace;

pub use error::{ScheduleError, SourceError};
pub use model::{FrameId, Observation, ScheduleEntry};
pub use schedule::ReferenceSchedule;
pub use source::{DataIdMap, ScheduleSource, GENERIC_DATA_ID, REFERENCE_FRAME_DATA_ID};
pub use trace::{TraceReader, TraceRecord};
