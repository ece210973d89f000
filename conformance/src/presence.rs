//! Set-based presence audit.
//!
//! Ignores ordering and cycles entirely: for every schedule row it asks only
//! whether a frame with the same node, slot and data id was seen anywhere in
//! the trace. Missing rows are cross-checked for near matches, which usually
//! point at a misconfigured node id or data-kind code rather than a lost frame.

use std::collections::BTreeSet;

use gttcan_schedule::{ScheduleEntry, TraceRecord};
use serde::Serialize;
use tracing::debug;

/// A seen frame that almost matches a missing schedule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum NearMatch {
    /// Same slot and data id, sent by another node.
    DifferentNode {
        /// Node that actually transmitted.
        seen_node: u8,
    },
    /// Same node and slot, carrying another data id.
    DifferentDataId {
        /// Data id actually carried.
        seen_data_id: u16,
    },
}

/// A schedule row never seen in the trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingEntry {
    /// The expected row.
    pub entry: ScheduleEntry,
    /// Seen frames differing in exactly the node or the data id.
    pub near_matches: Vec<NearMatch>,
}

/// Outcome of the presence audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresenceReport {
    /// Number of schedule rows.
    pub expected: usize,
    /// Rows seen at least once, in schedule order.
    pub found: Vec<ScheduleEntry>,
    /// Rows never seen, in schedule order.
    pub missing: Vec<MissingEntry>,
    /// `found / expected * 100`, or 0 for an empty schedule.
    pub accuracy_percent: f64,
}

impl PresenceReport {
    /// Returns true if every row was seen.
    #[must_use]
    pub fn all_present(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Converts trace records to `(node, slot, data)` rows. Records without a
/// payload carry no node id and are skipped.
#[must_use]
pub fn seen_entries(records: &[TraceRecord]) -> Vec<ScheduleEntry> {
    let seen: Vec<ScheduleEntry> = records
        .iter()
        .filter_map(|r| {
            r.node_id().map(|node_id| ScheduleEntry {
                node_id,
                slot_id: r.id.slot_id(),
                data_id: r.id.data_id(),
            })
        })
        .collect();
    debug!(
        records = records.len(),
        without_payload = records.len() - seen.len(),
        "collected seen frames"
    );
    seen
}

/// Checks which schedule rows appear in `seen`.
#[must_use]
pub fn audit(expected: &[ScheduleEntry], seen: &[ScheduleEntry]) -> PresenceReport {
    let seen: BTreeSet<ScheduleEntry> = seen.iter().copied().collect();
    let mut found = Vec::new();
    let mut missing = Vec::new();

    for &entry in expected {
        if seen.contains(&entry) {
            found.push(entry);
            continue;
        }
        let near_matches = seen
            .iter()
            .filter_map(|s| {
                if s.slot_id == entry.slot_id && s.data_id == entry.data_id {
                    Some(NearMatch::DifferentNode { seen_node: s.node_id })
                } else if s.node_id == entry.node_id && s.slot_id == entry.slot_id {
                    Some(NearMatch::DifferentDataId {
                        seen_data_id: s.data_id,
                    })
                } else {
                    None
                }
            })
            .collect();
        missing.push(MissingEntry {
            entry,
            near_matches,
        });
    }

    let accuracy_percent = if expected.is_empty() {
        0.0
    } else {
        found.len() as f64 / expected.len() as f64 * 100.0
    };
    PresenceReport {
        expected: expected.len(),
        found,
        missing,
        accuracy_percent,
    }
}
