//! Core types and events for ftp-courier
//!
//! A transfer run produces explicit per-file outcomes collected into batch
//! reports, rather than logging-and-swallowing failures at the point they
//! happen. Consumers can subscribe to [`Event`] values for live progress or
//! inspect the final [`RunOutcome`] for aggregate counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// Phases of a single transfer run
///
/// Each phase is fail-fast at its boundary: a failure aborts the run (not
/// the process) and the next scheduled tick starts over from `Configure`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Load and validate settings
    Configure,
    /// Open the remote session and ensure the destination directory exists
    Connect,
    /// Retrieve the remote listing, ensure staging exists, snapshot presence
    List,
    /// Download the eligible delta into staging
    Transfer,
    /// Close the session, relocate staged files, remove staging
    Finalize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Configure => "configure",
            Phase::Connect => "connect",
            Phase::List => "list",
            Phase::Transfer => "transfer",
            Phase::Finalize => "finalize",
        };
        write!(f, "{name}")
    }
}

/// Why a remote file was skipped rather than downloaded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Already present in the destination directory at run start
    AlreadyPresent,
    /// Reserved name on the exclusion list
    Excluded,
}

/// Outcome of one file within a fetch or relocate batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The file was downloaded (fetch) or moved into place (relocate)
    Done {
        /// Remote file name
        name: String,
    },
    /// The file was ineligible and not touched (fetch only)
    Skipped {
        /// Remote file name
        name: String,
        /// Why the file was skipped
        reason: SkipReason,
    },
    /// The operation on this file failed; later files were still attempted
    Failed {
        /// Remote file name
        name: String,
        /// Human-readable cause
        error: String,
    },
}

impl FileOutcome {
    /// The file name this outcome refers to
    pub fn name(&self) -> &str {
        match self {
            FileOutcome::Done { name }
            | FileOutcome::Skipped { name, .. }
            | FileOutcome::Failed { name, .. } => name,
        }
    }
}

/// Batch outcome of the fetch stage
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReport {
    /// One outcome per remote file, in listing order
    pub outcomes: Vec<FileOutcome>,
}

impl FetchReport {
    /// Names of files successfully written into staging
    pub fn fetched(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Done { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Number of files successfully written into staging
    pub fn fetched_count(&self) -> usize {
        self.fetched().count()
    }

    /// Number of files that failed to download
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Failed { .. }))
            .count()
    }

    /// Number of files skipped as already present or excluded
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Skipped { .. }))
            .count()
    }
}

/// Batch outcome of the relocate stage
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocateReport {
    /// One outcome per staged file
    pub outcomes: Vec<FileOutcome>,
}

impl RelocateReport {
    /// Number of files moved into the destination directory
    pub fn moved_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Done { .. }))
            .count()
    }

    /// Number of files that failed to move
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Failed { .. }))
            .count()
    }
}

/// Summary of one completed transfer run
///
/// "Completed" permits individual per-file failures; only phase-boundary
/// errors produce [`RunOutcome::AbortedAt`] instead.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// Per-file outcomes of the fetch stage
    pub fetch: FetchReport,
    /// Per-file outcomes of the relocate stage
    pub relocate: RelocateReport,
    /// Whether the staging directory was removed at the end of the run
    pub staging_removed: bool,
}

/// Terminal state of a transfer run
#[must_use]
#[derive(Debug)]
pub enum RunOutcome {
    /// All phases ran; per-file failures (if any) are in the report
    Completed(RunReport),
    /// A phase-boundary precondition failed and the run stopped there
    AbortedAt {
        /// The phase whose boundary step failed
        phase: Phase,
        /// The boundary error
        error: Error,
    },
}

impl RunOutcome {
    /// Whether the run reached its terminal `Completed` state
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

/// Events emitted during a transfer run
///
/// Broadcast to all subscribers of
/// [`FtpCourier::subscribe`](crate::FtpCourier::subscribe). Purely
/// observational; nothing consumes events for control decisions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A transfer run started
    RunStarted,

    /// A file was downloaded into staging
    FileFetched {
        /// Remote file name
        name: String,
    },

    /// Downloading a file failed; the run continues with the next file
    FileFetchFailed {
        /// Remote file name
        name: String,
        /// Human-readable cause
        error: String,
    },

    /// A staged file was moved into the destination directory
    FileMoved {
        /// File name
        name: String,
    },

    /// Moving a staged file failed; the run continues with the next file
    FileMoveFailed {
        /// File name
        name: String,
        /// Human-readable cause
        error: String,
    },

    /// The staging directory was removed at the end of the run
    StagingRemoved,

    /// A transfer run completed
    RunCompleted {
        /// Files downloaded into staging
        fetched: usize,
        /// Files moved into the destination directory
        moved: usize,
        /// Per-file failures across both stages
        failed: usize,
    },

    /// A transfer run aborted at a phase boundary
    RunAborted {
        /// The phase whose boundary step failed
        phase: Phase,
        /// Human-readable cause
        error: String,
    },
}
