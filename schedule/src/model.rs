//! Core schedule model types.
//!
//! A G-TTCAN frame identifier is a 32-bit value packing the schedule slot in
//! bits 16–31 and the data-kind code in bits 0–15. Schedule entries
//! additionally name the transmitting node, which travels in the first
//! payload byte rather than in the identifier.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// A packed 32-bit frame identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FrameId(pub u32);

impl FrameId {
    /// Packs a slot value and a data-kind code into an identifier.
    #[must_use]
    pub const fn from_parts(slot_id: u16, data_id: u16) -> Self {
        Self(((slot_id as u32) << 16) | data_id as u32)
    }

    /// Returns the slot component (bits 16–31).
    #[must_use]
    pub const fn slot_id(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Returns the data-kind component (bits 0–15).
    #[must_use]
    pub const fn data_id(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Returns the raw 32-bit value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl FromStr for FrameId {
    type Err = ParseIntError;

    /// Parses a hexadecimal identifier, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        u32::from_str_radix(digits, 16).map(Self)
    }
}

impl From<u32> for FrameId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// One `{ node_id, slot_id, data_id }` row of a global schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleEntry {
    /// Node expected to transmit in this slot.
    pub node_id: u8,
    /// Slot number within the cycle.
    pub slot_id: u16,
    /// Data-kind code carried in the identifier.
    pub data_id: u16,
}

impl ScheduleEntry {
    /// Returns the identifier a frame for this entry carries on the bus.
    #[must_use]
    pub const fn frame_id(&self) -> FrameId {
        FrameId::from_parts(self.slot_id, self.data_id)
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node {}, Slot 0x{:02X}, Data ID 0x{:04X}",
            self.node_id, self.slot_id, self.data_id
        )
    }
}

/// A frame identifier read from a trace, with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    /// Identifier of the observed frame.
    pub identifier: FrameId,
    /// 1-based line number in the trace.
    pub position: usize,
}

impl Observation {
    /// Creates an observation.
    #[must_use]
    pub const fn new(identifier: FrameId, position: usize) -> Self {
        Self {
            identifier,
            position,
        }
    }
}
