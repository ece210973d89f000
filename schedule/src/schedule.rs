//! The immutable reference schedule one bus cycle is expected to follow.

use std::collections::HashMap;

use crate::error::ScheduleError;
use crate::model::{FrameId, ScheduleEntry};

/// An ordered sequence of N distinct frame identifiers, N ≥ 1.
///
/// The identifier-to-index lookup is built once at construction and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSchedule {
    entries: Vec<FrameId>,
    index: HashMap<FrameId, usize>,
}

impl ReferenceSchedule {
    /// Builds a schedule from identifiers in cycle order.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Empty`] for an empty sequence and
    /// [`ScheduleError::DuplicateEntry`] when an identifier repeats.
    pub fn new(entries: Vec<FrameId>) -> Result<Self, ScheduleError> {
        if entries.is_empty() {
            return Err(ScheduleError::Empty);
        }
        let mut index = HashMap::with_capacity(entries.len());
        for (i, &id) in entries.iter().enumerate() {
            if let Some(&first) = index.get(&id) {
                return Err(ScheduleError::DuplicateEntry {
                    id,
                    first,
                    second: i,
                });
            }
            index.insert(id, i);
        }
        Ok(Self { entries, index })
    }

    /// Builds a schedule from parsed global-schedule rows.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ReferenceSchedule::new`].
    pub fn from_entries(entries: &[ScheduleEntry]) -> Result<Self, ScheduleError> {
        Self::new(entries.iter().map(ScheduleEntry::frame_id).collect())
    }

    /// Number of frames in one cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a schedule cannot be constructed empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers in cycle order.
    #[must_use]
    pub fn entries(&self) -> &[FrameId] {
        &self.entries
    }

    /// Returns the cycle position of `id`, if it is scheduled.
    #[must_use]
    pub fn index_of(&self, id: FrameId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Returns the identifier scheduled at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<FrameId> {
        self.entries.get(index).copied()
    }
}
