//! Renderers for [`AggregateReport`] and [`PresenceReport`].
//!
//! The reports are plain data; these are the two presentations the command
//! line tools offer.

use std::fmt;

use crate::presence::{NearMatch, PresenceReport};
use crate::report::AggregateReport;

/// Human-readable summary followed by one block per anomalous cycle.
pub struct Text<'a>(pub &'a AggregateReport);

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(f, "Reference Schedule Size:      {}", r.schedule_size)?;
        writeln!(f, "Log Frame Count:              {}", r.ingested)?;
        writeln!(f, "Scheduled Frames:             {}", r.aligned)?;
        writeln!(f, "Frames After Trimming:        {}", r.retained)?;
        writeln!(f, "Missing Frames:               {}", r.total_missing)?;
        writeln!(f, "Duplicate Frames:             {}", r.total_duplicates)?;
        writeln!(f, "Out-of-Order Events:          {}", r.total_out_of_order)?;
        writeln!(f, "Completed Cycles Detected:    {}", r.completed_cycles)?;
        writeln!(f, "Frame Presence:               {:.2}%", r.presence_percent)?;
        writeln!(f, "Frame Missing Rate:           {:.2}%", r.missing_percent)?;
        if !r.trimmed {
            writeln!(
                f,
                "Note: fewer than two cycle boundaries; first and last cycles may be partial."
            )?;
        }

        for cycle in r.anomalous_cycles() {
            writeln!(f)?;
            writeln!(
                f,
                "Cycle {} (lines {}-{}):",
                cycle.number, cycle.first_position, cycle.last_position
            )?;
            if !cycle.missing.is_empty() {
                writeln!(
                    f,
                    "  Missing Frames:      {} at lines {:?}",
                    cycle.missing.count, cycle.missing.positions
                )?;
            }
            if !cycle.duplicates.is_empty() {
                writeln!(
                    f,
                    "  Duplicate Frames:    {} at lines {:?}",
                    cycle.duplicates.count, cycle.duplicates.positions
                )?;
            }
            if !cycle.out_of_order.is_empty() {
                writeln!(
                    f,
                    "  Out-of-Order:        {} at lines {:?}",
                    cycle.out_of_order.count, cycle.out_of_order.positions
                )?;
            }
        }
        Ok(())
    }
}

/// Pretty-printed JSON of the full report.
///
/// # Errors
///
/// Returns the serializer error; none is expected for this data.
pub fn json(report: &AggregateReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Found/missing summary of a presence audit.
pub struct PresenceText<'a>(pub &'a PresenceReport);

impl fmt::Display for PresenceText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(
            f,
            "Correct frames: {}/{} ({:.1}%)",
            r.found.len(),
            r.expected,
            r.accuracy_percent
        )?;
        if r.all_present() {
            return writeln!(f, "All frames accounted for!");
        }
        writeln!(f)?;
        writeln!(f, "Missing frames:")?;
        for missing in &r.missing {
            writeln!(f, "{}", missing.entry)?;
        }
        for missing in &r.missing {
            for near in &missing.near_matches {
                match near {
                    NearMatch::DifferentNode { seen_node } => writeln!(
                        f,
                        "  - Found with different node: expected Node {}, found Node {}",
                        missing.entry.node_id, seen_node
                    )?,
                    NearMatch::DifferentDataId { seen_data_id } => writeln!(
                        f,
                        "  - Found with different data_id: expected 0x{:04X}, found 0x{:04X}",
                        missing.entry.data_id, seen_data_id
                    )?,
                }
            }
        }
        Ok(())
    }
}
