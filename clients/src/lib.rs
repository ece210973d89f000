//! Shared plumbing for the G-TTCAN client binaries.
//!
//! - [`config`]: the optional `gttcan.toml` configuration file
//! - [`fetch`]: copying a captured trace off the target board
//! - [`logging`]: `tracing` subscriber setup
//!
//! The binaries themselves live in `src/bin/`.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod fetch;
pub mod logging;

pub use config::{Config, ConfigError, RemoteConfig};
pub use fetch::{fetch_trace, FetchError, FetchOutcome};
