//! Reads captured bus traces.
//!
//! A trace line carries a frame when it contains a bracketed 8-hex-digit
//! identifier, typically followed by the data length and payload bytes:
//!
//! ```text
//! <0x00140001> [8] 01 00 00 00 00 00 00 01
//! ```
//!
//! Lines without an identifier are skipped; positions are 1-based line
//! numbers of the whole file, so they stay meaningful to a reader of the log.

use std::io::BufRead;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::error::SourceError;
use crate::model::{FrameId, Observation};

const ID_PATTERN: &str = r"<(0[xX][0-9a-fA-F]{8})>";

/// One frame line of a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceRecord {
    /// 1-based line number.
    pub position: usize,
    /// Frame identifier.
    pub id: FrameId,
    /// Payload bytes following the `[dlc]` token, if any.
    pub payload: Vec<u8>,
}

impl TraceRecord {
    /// Transmitting node, taken from the first payload byte.
    #[must_use]
    pub fn node_id(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// The `(identifier, position)` pair consumed by conformance analysis.
    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation::new(self.id, self.position)
    }
}

/// Line-oriented trace parser.
#[derive(Debug, Clone)]
pub struct TraceReader {
    pattern: Regex,
}

impl TraceReader {
    /// Creates a reader.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Pattern`] if the identifier pattern fails to compile.
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self {
            pattern: Regex::new(ID_PATTERN)?,
        })
    }

    /// Parses one line, returning `None` when it carries no frame.
    #[must_use]
    pub fn parse_line(&self, position: usize, line: &str) -> Option<TraceRecord> {
        let caps = self.pattern.captures(line)?;
        let token = caps.get(1)?;
        let id = token.as_str().parse::<FrameId>().ok()?;
        let rest = line.get(token.end() + 1..).unwrap_or("");
        Some(TraceRecord {
            position,
            id,
            payload: parse_payload(rest),
        })
    }

    /// Parses a whole trace held in memory.
    #[must_use]
    pub fn parse_str(&self, text: &str) -> Vec<TraceRecord> {
        text.lines()
            .enumerate()
            .filter_map(|(i, line)| self.parse_line(i + 1, line))
            .collect()
    }

    /// Parses a trace from any buffered reader.
    ///
    /// Bytes that are not valid UTF-8 are replaced, so a corrupted line
    /// affects only itself.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the reader fails.
    pub fn read<R: BufRead>(&self, mut reader: R) -> std::io::Result<Vec<TraceRecord>> {
        let mut records = Vec::new();
        let mut buf = Vec::new();
        let mut position = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            position += 1;
            let line = String::from_utf8_lossy(&buf);
            if let Some(record) = self.parse_line(position, line.trim_end_matches(['\r', '\n'])) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Reads and parses a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be opened or read.
    pub fn read_path(&self, path: &Path) -> Result<Vec<TraceRecord>, SourceError> {
        let io_err = |source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::open(path).map_err(io_err)?;
        let records = self
            .read(std::io::BufReader::new(file))
            .map_err(io_err)?;
        debug!(path = %path.display(), frames = records.len(), "read trace");
        Ok(records)
    }
}

/// Payload bytes after an optional `[dlc]` token; stops at the first
/// token that is not a hex byte.
fn parse_payload(rest: &str) -> Vec<u8> {
    let mut tokens = rest.split_whitespace().peekable();
    if tokens
        .peek()
        .is_some_and(|t| t.starts_with('[') && t.ends_with(']'))
    {
        tokens.next();
    }
    tokens
        .map_while(|t| {
            if t.len() <= 2 {
                u8::from_str_radix(t, 16).ok()
            } else {
                None
            }
        })
        .collect()
}
