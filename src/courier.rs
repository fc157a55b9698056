//! Run orchestrator wiring settings, connection lifecycle, fetch, and
//! relocation into one end-to-end transfer pass
//!
//! A run walks five phases — Configure, Connect, List, Transfer, Finalize —
//! each fail-fast at its boundary. A boundary failure aborts the *run*, not
//! the process; the next scheduled tick starts fresh from Configure. Within
//! the Transfer and Finalize file loops, failures are isolated per file and
//! never abort the run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::error::Error;
use crate::fetcher;
use crate::relocator;
use crate::remote::{FtpConnector, RemoteConnector};
use crate::types::{Event, Phase, RunOutcome, RunReport};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Where a courier gets its settings for each run
enum SettingsSource {
    /// Re-read and re-validate this settings file at the start of every run
    File(PathBuf),
    /// Use these settings as-is for every run
    Fixed(Box<Settings>),
}

/// Scheduled FTP transfer orchestrator
///
/// One `run_once` call performs a complete transfer pass. The courier holds
/// no state between runs; everything it needs is re-derived from settings
/// and the filesystem at the start of each pass.
///
/// # Example
///
/// ```no_run
/// use ftp_courier::FtpCourier;
///
/// #[tokio::main]
/// async fn main() {
///     let courier = FtpCourier::from_settings_file("settings.json");
///
///     // Subscribe to events
///     let mut events = courier.subscribe();
///     tokio::spawn(async move {
///         while let Ok(event) = events.recv().await {
///             println!("Event: {:?}", event);
///         }
///     });
///
///     let outcome = courier.run_once().await;
///     println!("run completed: {}", outcome.is_completed());
/// }
/// ```
pub struct FtpCourier {
    settings: SettingsSource,
    connector: Arc<dyn RemoteConnector>,
    event_tx: broadcast::Sender<Event>,
}

impl FtpCourier {
    /// Create a courier with fixed in-memory settings and the FTP transport
    pub fn new(settings: Settings) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            settings: SettingsSource::Fixed(Box::new(settings)),
            connector: Arc::new(FtpConnector),
            event_tx,
        }
    }

    /// Create a courier that re-reads the given settings file on every run
    ///
    /// Settings edits take effect at the next run without a restart, and a
    /// missing or malformed file aborts that run in the Configure phase.
    pub fn from_settings_file(path: impl Into<PathBuf>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            settings: SettingsSource::File(path.into()),
            connector: Arc::new(FtpConnector),
            event_tx,
        }
    }

    /// Replace the remote transport (e.g. with
    /// [`MemoryConnector`](crate::remote::MemoryConnector) in tests)
    pub fn with_connector(mut self, connector: Arc<dyn RemoteConnector>) -> Self {
        self.connector = connector;
        self
    }

    /// Subscribe to run events
    ///
    /// Multiple subscribers are supported; slow subscribers may miss events
    /// (broadcast semantics), which is acceptable for observability.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Execute one complete transfer run
    ///
    /// Never returns an error: the terminal state is encoded in
    /// [`RunOutcome`], and the caller (typically the scheduler task) keeps
    /// ticking regardless of how the run ended.
    pub async fn run_once(&self) -> RunOutcome {
        let started_at = Utc::now();
        info!("transfer run started");
        self.event_tx.send(Event::RunStarted).ok();

        match self.execute(started_at).await {
            Ok(report) => {
                let fetched = report.fetch.fetched_count();
                let moved = report.relocate.moved_count();
                let failed = report.fetch.failed_count() + report.relocate.failed_count();
                info!(fetched, moved, failed, "transfer run completed");
                self.event_tx
                    .send(Event::RunCompleted {
                        fetched,
                        moved,
                        failed,
                    })
                    .ok();
                RunOutcome::Completed(report)
            }
            Err((phase, err)) => {
                error!(phase = %phase, error = %err, "transfer run aborted");
                self.event_tx
                    .send(Event::RunAborted {
                        phase,
                        error: err.to_string(),
                    })
                    .ok();
                RunOutcome::AbortedAt { phase, error: err }
            }
        }
    }

    /// Walk the five phases, mapping each boundary failure to its phase
    async fn execute(
        &self,
        started_at: chrono::DateTime<Utc>,
    ) -> std::result::Result<RunReport, (Phase, Error)> {
        // Configure
        let settings = self
            .load_settings()
            .await
            .map_err(|e| (Phase::Configure, e))?;
        let destination = settings.transfer.download_folder.clone();
        let staging = settings.transfer.staging_folder.clone();

        // Connect
        let mut endpoint = self
            .connector
            .connect(&settings.remote)
            .await
            .map_err(|e| (Phase::Connect, e))?;
        debug!(transport = endpoint.name(), "remote session open");
        tokio::fs::create_dir_all(&destination)
            .await
            .map_err(|e| (Phase::Connect, e.into()))?;

        // List
        let remote_files = endpoint.list().await.map_err(|e| (Phase::List, e))?;
        debug!(count = remote_files.len(), "remote listing retrieved");
        tokio::fs::create_dir_all(&staging)
            .await
            .map_err(|e| (Phase::List, e.into()))?;
        let already_present = read_dir_names(&destination)
            .await
            .map_err(|e| (Phase::List, e))?;

        // Transfer: per-file failures are captured in the report
        let fetch_report = fetcher::fetch(
            endpoint.as_mut(),
            &remote_files,
            &already_present,
            &settings.transfer.exclusions,
            &staging,
            &self.event_tx,
        )
        .await;

        // Finalize: the session must close cleanly before anything moves
        endpoint.close().await.map_err(|e| (Phase::Finalize, e))?;
        debug!("remote session closed");

        let mut staged: Vec<String> = read_dir_names(&staging)
            .await
            .map_err(|e| (Phase::Finalize, e))?
            .into_iter()
            .collect();
        staged.sort_unstable();

        let relocate_report =
            relocator::relocate(&staged, &staging, &destination, &self.event_tx).await;

        let staging_removed = relocator::remove_staging_dir(&staging).await;
        if staging_removed {
            self.event_tx.send(Event::StagingRemoved).ok();
        }

        Ok(RunReport {
            started_at,
            finished_at: Utc::now(),
            fetch: fetch_report,
            relocate: relocate_report,
            staging_removed,
        })
    }

    /// Resolve settings for this run from the courier's source
    async fn load_settings(&self) -> crate::Result<Settings> {
        match &self.settings {
            SettingsSource::File(path) => Settings::load(path).await,
            SettingsSource::Fixed(settings) => {
                settings.validate()?;
                Ok(settings.as_ref().clone())
            }
        }
    }
}

/// Snapshot the plain file names in a directory
async fn read_dir_names(dir: &Path) -> crate::Result<HashSet<String>> {
    let mut names = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            names.insert(name.to_owned());
        }
    }
    Ok(names)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_dir_names() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.txt"), b"x").await.unwrap();
        tokio::fs::write(dir.path().join("b.txt"), b"y").await.unwrap();

        let names = read_dir_names(dir.path()).await.unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("a.txt"));
        assert!(names.contains("b.txt"));
    }

    #[tokio::test]
    async fn test_read_dir_names_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_dir_names(&dir.path().join("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_fixed_settings_are_validated_each_run() {
        let mut settings: Settings = serde_json::from_str(
            r#"{
                "Host": "ftp.partner.example",
                "User": "courier",
                "Password": "hunter2",
                "DownloadFolder": "/srv/incoming"
            }"#,
        )
        .unwrap();
        settings.remote.host.clear();

        let courier = FtpCourier::new(settings);
        let outcome = courier.run_once().await;
        match outcome {
            RunOutcome::AbortedAt { phase, .. } => assert_eq!(phase, Phase::Configure),
            other => panic!("expected configure abort, got {other:?}"),
        }
    }
}
