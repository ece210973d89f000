//! Copies a captured trace off the target board with `scp`.
//!
//! A failed transfer is not fatal: the previous local capture is used
//! instead, as long as one exists.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::config::RemoteConfig;

/// How the local trace was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The remote file was copied over the local one.
    Downloaded,
    /// The transfer failed; the existing local file is used.
    LocalFallback {
        /// Why the transfer failed.
        reason: String,
    },
    /// No transfer was attempted.
    Skipped,
}

/// No usable local trace after the fetch step.
#[derive(Debug, thiserror::Error)]
#[error("no local trace at {} ({outcome})", .path.display())]
pub struct FetchError {
    /// Expected local trace path.
    pub path: PathBuf,
    /// What happened to the transfer.
    pub outcome: String,
}

/// Copies `remote` to `local`, falling back to an existing local file.
///
/// With `skip` set no transfer is attempted.
///
/// # Errors
///
/// Returns [`FetchError`] if, after the transfer attempt, `local` does not exist.
pub fn fetch_trace(remote: &RemoteConfig, local: &Path, skip: bool) -> Result<FetchOutcome, FetchError> {
    let outcome = if skip {
        FetchOutcome::Skipped
    } else {
        run_scp(remote, local)
    };

    match &outcome {
        FetchOutcome::Downloaded => info!(source = %remote.scp_source(), "download complete"),
        FetchOutcome::LocalFallback { reason } => {
            warn!(%reason, local = %local.display(), "download failed, using local file");
        }
        FetchOutcome::Skipped => {}
    }

    if !local.is_file() {
        return Err(FetchError {
            path: local.to_path_buf(),
            outcome: match outcome {
                FetchOutcome::Downloaded => "downloaded".to_string(),
                FetchOutcome::LocalFallback { reason } => reason,
                FetchOutcome::Skipped => "download skipped".to_string(),
            },
        });
    }
    Ok(outcome)
}

fn run_scp(remote: &RemoteConfig, local: &Path) -> FetchOutcome {
    let source = remote.scp_source();
    info!(%source, local = %local.display(), "downloading trace");
    match Command::new("scp").arg(&source).arg(local).status() {
        Ok(status) if status.success() => FetchOutcome::Downloaded,
        Ok(status) => FetchOutcome::LocalFallback {
            reason: format!("scp exited with {status}"),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => FetchOutcome::LocalFallback {
            reason: "scp command not found".to_string(),
        },
        Err(e) => FetchOutcome::LocalFallback {
            reason: format!("scp could not be started: {e}"),
        },
    }
}
