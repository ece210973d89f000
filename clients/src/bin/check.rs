//! `gttcan-check`: Checks a captured CAN trace against a G-TTCAN schedule.
//!
//! Loads the global schedule from its C source, reads the trace, and prints
//! the conformance report.
//!
//! **Usage:**
//! ```
//! gttcan-check <schedule.c> <trace.txt> [--config <path>] [--format text|json]
//!              [--boundary any-decrease|nearest-wrap] [--strict]
//! ```
//!
//! Exits non-zero if the trace shares no frame with the schedule, or with
//! `--strict` if any anomaly was found.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gttcan_clients::{logging, Config};
use gttcan_conformance::{analyze, render, AggregateReport, AnalysisError, BoundaryRule};
use gttcan_schedule::{Observation, ReferenceSchedule, ScheduleSource, TraceReader};
use tracing::info;

/// Report presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable summary.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Check a G-TTCAN trace against its reference schedule.
#[derive(Parser)]
#[command(
    name = "gttcan-check",
    about = "Check a captured G-TTCAN trace against the global schedule"
)]
struct Args {
    /// C source with the `{ node, slot, DATA_ID }` schedule initialiser.
    schedule: PathBuf,

    /// Captured trace, one frame per line.
    trace: PathBuf,

    /// Configuration file (default: built-in settings).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Cycle boundary rule, overriding the config file.
    #[arg(long)]
    boundary: Option<BoundaryRule>,

    /// Exit non-zero if any cycle has an anomaly.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref())?;
    let mut options = config.analysis;
    if let Some(rule) = args.boundary {
        options.boundary = rule;
    }

    let source = ScheduleSource::new(config.data_id_map())?;
    let entries = source.read_path(&args.schedule)?;
    let schedule = ReferenceSchedule::from_entries(&entries)
        .with_context(|| format!("invalid schedule in {}", args.schedule.display()))?;
    info!(entries = schedule.len(), "reference schedule loaded");

    let records = TraceReader::new()?.read_path(&args.trace)?;
    let observations: Vec<Observation> = records.iter().map(|r| r.observation()).collect();
    info!(frames = observations.len(), "trace loaded");

    let (report, no_overlap) = match analyze(&schedule, &observations, &options) {
        Ok(report) => (report, false),
        Err(e @ AnalysisError::NoOverlap { .. }) => {
            eprintln!("error: {e}");
            (
                AggregateReport::no_overlap(schedule.len(), observations.len()),
                true,
            )
        }
        Err(e) => return Err(e.into()),
    };

    match args.format {
        Format::Text => print!("{}", render::Text(&report)),
        Format::Json => println!("{}", render::json(&report)?),
    }

    if no_overlap || (args.strict && !report.is_clean()) {
        process::exit(1);
    }
    Ok(())
}
