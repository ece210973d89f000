//! Reads the reference schedule from a C `global_schedule` initialiser.
//!
//! Each row of the initialiser has the shape `{ node_id, slot_id, DATA_ID }`.
//! Node ids are decimal; slot ids are decimal or `0x` hexadecimal and are
//! masked to 16 bits; data ids are either numeric literals or symbolic
//! constants resolved through a [`DataIdMap`].

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::model::ScheduleEntry;

/// Data-kind code of reference (time-master) frames.
pub const REFERENCE_FRAME_DATA_ID: u16 = 0;

/// Data-kind code of ordinary payload frames.
pub const GENERIC_DATA_ID: u16 = 1;

const ENTRY_PATTERN: &str = r"\{\s*(\d+)\s*,\s*(0[xX][0-9a-fA-F]+|\d+)\s*,\s*([A-Za-z_][A-Za-z0-9_]*|0[xX][0-9a-fA-F]+|\d+)\s*\}";

/// Resolves symbolic data-kind tokens to numeric codes.
///
/// Tokens not in the map resolve to [`DataIdMap::default_code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataIdMap {
    symbols: BTreeMap<String, u16>,
    default_code: u16,
}

impl DataIdMap {
    /// Creates an empty map with the given fallback code.
    #[must_use]
    pub fn new(default_code: u16) -> Self {
        Self {
            symbols: BTreeMap::new(),
            default_code,
        }
    }

    /// Adds or replaces a symbol.
    #[must_use]
    pub fn with(mut self, symbol: impl Into<String>, code: u16) -> Self {
        self.insert(symbol, code);
        self
    }

    /// Adds or replaces a symbol in place.
    pub fn insert(&mut self, symbol: impl Into<String>, code: u16) {
        self.symbols.insert(symbol.into(), code);
    }

    /// Code used for unrecognised symbols.
    #[must_use]
    pub fn default_code(&self) -> u16 {
        self.default_code
    }

    /// Looks up a symbol without falling back.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<u16> {
        self.symbols.get(symbol).copied()
    }

    /// Resolves a data id token: numeric literals are taken as-is, symbols
    /// are looked up, and unknown symbols fall back to the default code.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidLiteral`] if a numeric literal does not
    /// fit in 16 bits.
    pub fn resolve(&self, token: &str) -> Result<u16, SourceError> {
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            return parse_literal(token)
                .and_then(|v| u16::try_from(v).ok())
                .ok_or_else(|| SourceError::InvalidLiteral {
                    field: "data_id",
                    token: token.to_string(),
                });
        }
        match self.get(token) {
            Some(code) => Ok(code),
            None => {
                warn!(
                    symbol = token,
                    fallback = self.default_code,
                    "unknown data id symbol"
                );
                Ok(self.default_code)
            }
        }
    }
}

impl Default for DataIdMap {
    fn default() -> Self {
        Self::new(REFERENCE_FRAME_DATA_ID)
            .with("REFERENCE_FRAME_DATA_ID", REFERENCE_FRAME_DATA_ID)
            .with("GENERIC_DATA_ID", GENERIC_DATA_ID)
    }
}

/// Parser for `global_schedule` initialisers.
#[derive(Debug, Clone)]
pub struct ScheduleSource {
    data_ids: DataIdMap,
    pattern: Regex,
}

impl ScheduleSource {
    /// Creates a parser resolving data ids through `data_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Pattern`] if the entry pattern fails to compile.
    pub fn new(data_ids: DataIdMap) -> Result<Self, SourceError> {
        Ok(Self {
            data_ids,
            pattern: Regex::new(ENTRY_PATTERN)?,
        })
    }

    /// Extracts schedule rows from C source text, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NoEntries`] if the text holds no rows, or
    /// [`SourceError::InvalidLiteral`] if a literal overflows its field.
    pub fn parse_str(&self, text: &str) -> Result<Vec<ScheduleEntry>, SourceError> {
        let mut entries = Vec::new();
        for caps in self.pattern.captures_iter(text) {
            let node_token = &caps[1];
            let node_id = node_token
                .parse::<u8>()
                .map_err(|_| SourceError::InvalidLiteral {
                    field: "node_id",
                    token: node_token.to_string(),
                })?;
            let slot_token = &caps[2];
            let slot = parse_literal(slot_token).ok_or_else(|| SourceError::InvalidLiteral {
                field: "slot_id",
                token: slot_token.to_string(),
            })?;
            entries.push(ScheduleEntry {
                node_id,
                slot_id: (slot & 0xFFFF) as u16,
                data_id: self.data_ids.resolve(&caps[3])?,
            });
        }
        if entries.is_empty() {
            return Err(SourceError::NoEntries);
        }
        debug!(entries = entries.len(), "parsed schedule source");
        Ok(entries)
    }

    /// Reads and parses a schedule source file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be read, otherwise the
    /// errors of [`ScheduleSource::parse_str`].
    pub fn read_path(&self, path: &Path) -> Result<Vec<ScheduleEntry>, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&text)
    }
}

fn parse_literal(token: &str) -> Option<u64> {
    match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
#include "global_schedule.h"

global_schedule_entry_t global_schedule[] = {
    {1, 0, REFERENCE_FRAME_DATA_ID},
    {1, 20, GENERIC_DATA_ID},
    {1, 40, REFERENCE_FRAME_DATA_ID },
    { 2, 0x46, GENERIC_DATA_ID },
    {2, 0x4B, 0x0001},
};
"#;

    fn parse(text: &str) -> Result<Vec<ScheduleEntry>, SourceError> {
        ScheduleSource::new(DataIdMap::default())?.parse_str(text)
    }

    #[test]
    fn parses_rows_in_source_order() {
        let entries = parse(SOURCE).unwrap();
        let slots: Vec<u16> = entries.iter().map(|e| e.slot_id).collect();
        assert_eq!(slots, vec![0, 20, 40, 0x46, 0x4B]);
        assert_eq!(entries[0].data_id, REFERENCE_FRAME_DATA_ID);
        assert_eq!(entries[1].data_id, GENERIC_DATA_ID);
        assert_eq!(entries[3].node_id, 2);
        assert_eq!(entries[4].data_id, 1);
    }

    #[test]
    fn unknown_symbol_falls_back_to_default() {
        let entries = parse("{3, 7, HEARTBEAT_DATA_ID}").unwrap();
        assert_eq!(entries[0].data_id, REFERENCE_FRAME_DATA_ID);

        let map = DataIdMap::new(9).with("HEARTBEAT_DATA_ID", 4);
        let source = ScheduleSource::new(map).unwrap();
        let entries = source.parse_str("{3, 7, HEARTBEAT_DATA_ID} {3, 8, OTHER}").unwrap();
        assert_eq!(entries[0].data_id, 4);
        assert_eq!(entries[1].data_id, 9);
    }

    #[test]
    fn slot_is_masked_to_sixteen_bits() {
        let entries = parse("{1, 0x12345, GENERIC_DATA_ID}").unwrap();
        assert_eq!(entries[0].slot_id, 0x2345);
    }

    #[test]
    fn text_without_rows_is_an_error() {
        assert!(matches!(
            parse("int main(void) { return 0; }"),
            Err(SourceError::NoEntries)
        ));
    }

    #[test]
    fn oversized_literals_are_rejected() {
        assert!(matches!(
            parse("{300, 1, GENERIC_DATA_ID}"),
            Err(SourceError::InvalidLiteral {
                field: "node_id",
                ..
            })
        ));
        assert!(matches!(
            parse("{1, 1, 0x10000}"),
            Err(SourceError::InvalidLiteral {
                field: "data_id",
                ..
            })
        ));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("global_schedule.c");
        std::fs::write(&path, SOURCE).unwrap();
        let source = ScheduleSource::new(DataIdMap::default()).unwrap();
        assert_eq!(source.read_path(&path).unwrap().len(), 5);
        assert!(matches!(
            source.read_path(&dir.path().join("missing.c")),
            Err(SourceError::Io { .. })
        ));
    }
}
