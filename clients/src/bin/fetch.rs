//! `gttcan-fetch`: Downloads a trace from the board and audits frame presence.
//!
//! Copies the capture off the target with `scp` (falling back to the last
//! local copy), then reports which schedule rows were seen at least once.
//!
//! **Usage:**
//! ```
//! gttcan-fetch <schedule.c> [--config <path>] [--local <path>] [--no-fetch]
//!              [--show <n>] [--analyze]
//! ```
//!
//! Exits non-zero if any schedule row was never seen.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use gttcan_clients::{fetch_trace, logging, Config};
use gttcan_conformance::{analyze, presence, render};
use gttcan_schedule::{Observation, ReferenceSchedule, ScheduleSource, TraceReader};
use tracing::warn;

/// Fetch a G-TTCAN trace and check every scheduled frame was seen.
#[derive(Parser)]
#[command(
    name = "gttcan-fetch",
    about = "Download a G-TTCAN trace and audit which scheduled frames appear"
)]
struct Args {
    /// C source with the `{ node, slot, DATA_ID }` schedule initialiser.
    schedule: PathBuf,

    /// Configuration file (default: built-in settings).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Local trace path the download is written to.
    #[arg(long, default_value = "output.txt")]
    local: PathBuf,

    /// Use the existing local trace without downloading.
    #[arg(long)]
    no_fetch: bool,

    /// Number of seen frames to list.
    #[arg(long, default_value_t = 20)]
    show: usize,

    /// Also run the cycle conformance analysis on the trace.
    #[arg(long)]
    analyze: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref())?;
    fetch_trace(&config.remote, &args.local, args.no_fetch)?;

    let source = ScheduleSource::new(config.data_id_map())?;
    let expected = source.read_path(&args.schedule)?;
    let records = TraceReader::new()?.read_path(&args.local)?;
    let seen = presence::seen_entries(&records);

    println!("Found {} frames.", seen.len());
    println!("Expecting {} frames.", expected.len());
    println!();

    let audit = presence::audit(&expected, &seen);
    print!("{}", render::PresenceText(&audit));

    if args.show > 0 && !seen.is_empty() {
        println!();
        println!("First {} seen frames:", args.show.min(seen.len()));
        for entry in seen.iter().take(args.show) {
            println!("  {entry}");
        }
    }

    if args.analyze {
        match ReferenceSchedule::from_entries(&expected) {
            Ok(schedule) => {
                let observations: Vec<Observation> =
                    records.iter().map(|r| r.observation()).collect();
                match analyze(&schedule, &observations, &config.analysis) {
                    Ok(report) => {
                        println!();
                        print!("{}", render::Text(&report));
                    }
                    Err(e) => warn!(error = %e, "conformance analysis skipped"),
                }
            }
            Err(e) => warn!(error = %e, "conformance analysis skipped"),
        }
    }

    if !audit.all_present() {
        process::exit(1);
    }
    Ok(())
}
