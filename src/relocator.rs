//! Relocation of staged files into the destination directory
//!
//! Moves prefer an atomic rename and fall back to copy + delete when source
//! and destination live on different filesystems. A name collision in the
//! destination is overwritten (last write wins). Failures are isolated per
//! file, mirroring the fetch stage.

use std::path::Path;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::error::Result;
use crate::types::{Event, FileOutcome, RelocateReport};

/// Move every staged file into `destination_dir`
///
/// The returned report carries one outcome per staged file. Files that fail
/// to move stay behind in staging; the caller's later attempt to remove the
/// staging directory will then fail and be logged, leaving the residue
/// visible for the next run.
pub async fn relocate(
    staged_files: &[String],
    staging_dir: &Path,
    destination_dir: &Path,
    event_tx: &broadcast::Sender<Event>,
) -> RelocateReport {
    let mut outcomes = Vec::with_capacity(staged_files.len());

    for name in staged_files {
        info!(file = %name, "moving");
        match move_file(&staging_dir.join(name), &destination_dir.join(name)).await {
            Ok(()) => {
                info!(file = %name, "moved");
                event_tx.send(Event::FileMoved { name: name.clone() }).ok();
                outcomes.push(FileOutcome::Done { name: name.clone() });
            }
            Err(e) => {
                warn!(file = %name, error = %e, "failed to move file");
                event_tx
                    .send(Event::FileMoveFailed {
                        name: name.clone(),
                        error: e.to_string(),
                    })
                    .ok();
                outcomes.push(FileOutcome::Failed {
                    name: name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    RelocateReport { outcomes }
}

/// Move one file, preferring rename and falling back to copy + delete
/// when the rename crosses a filesystem boundary
async fn move_file(from: &Path, to: &Path) -> Result<()> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            tokio::fs::copy(from, to).await?;
            tokio::fs::remove_file(from).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Attempt to remove the staging directory, returning whether it is gone
///
/// The removal is non-recursive: it fails whenever residual files remain
/// from earlier per-file failures, which is logged and tolerated.
pub async fn remove_staging_dir(staging_dir: &Path) -> bool {
    match tokio::fs::remove_dir(staging_dir).await {
        Ok(()) => {
            info!(path = %staging_dir.display(), "removed staging directory");
            true
        }
        Err(e) => {
            warn!(path = %staging_dir.display(), error = %e, "could not remove staging directory");
            false
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_owned()).collect()
    }

    async fn stage_file(dir: &Path, name: &str, content: &[u8]) {
        tokio::fs::write(dir.join(name), content).await.unwrap();
    }

    #[tokio::test]
    async fn test_relocate_moves_all_staged_files() {
        let staging = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        stage_file(staging.path(), "a.txt", b"alpha").await;
        stage_file(staging.path(), "b.txt", b"beta").await;
        let (event_tx, _) = broadcast::channel(16);

        let report = relocate(
            &names(&["a.txt", "b.txt"]),
            staging.path(),
            destination.path(),
            &event_tx,
        )
        .await;

        assert_eq!(report.moved_count(), 2);
        assert_eq!(report.failed_count(), 0);
        assert!(destination.path().join("a.txt").exists());
        assert!(destination.path().join("b.txt").exists());
        assert!(!staging.path().join("a.txt").exists());
        assert!(!staging.path().join("b.txt").exists());
    }

    #[tokio::test]
    async fn test_relocate_overwrites_destination_collision() {
        let staging = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        stage_file(staging.path(), "a.txt", b"new").await;
        tokio::fs::write(destination.path().join("a.txt"), b"old")
            .await
            .unwrap();
        let (event_tx, _) = broadcast::channel(16);

        let report = relocate(
            &names(&["a.txt"]),
            staging.path(),
            destination.path(),
            &event_tx,
        )
        .await;

        assert_eq!(report.moved_count(), 1);
        let content = tokio::fs::read(destination.path().join("a.txt"))
            .await
            .unwrap();
        assert_eq!(content, b"new");
    }

    #[tokio::test]
    async fn test_relocate_failure_does_not_short_circuit() {
        let staging = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        // "ghost" was never staged, so its move fails; "b.txt" must still move
        stage_file(staging.path(), "b.txt", b"beta").await;
        let (event_tx, _) = broadcast::channel(16);

        let report = relocate(
            &names(&["ghost", "b.txt"]),
            staging.path(),
            destination.path(),
            &event_tx,
        )
        .await;

        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.moved_count(), 1);
        assert!(matches!(
            &report.outcomes[0],
            FileOutcome::Failed { name, .. } if name == "ghost"
        ));
        assert!(destination.path().join("b.txt").exists());
    }

    #[tokio::test]
    async fn test_relocate_emits_events() {
        let staging = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        stage_file(staging.path(), "a.txt", b"alpha").await;
        let (event_tx, mut event_rx) = broadcast::channel(16);

        relocate(
            &names(&["a.txt"]),
            staging.path(),
            destination.path(),
            &event_tx,
        )
        .await;

        assert_eq!(
            event_rx.try_recv().unwrap(),
            Event::FileMoved {
                name: "a.txt".into()
            }
        );
    }

    #[tokio::test]
    async fn test_remove_staging_dir_when_empty() {
        let parent = tempfile::tempdir().unwrap();
        let staging = parent.path().join("staging");
        tokio::fs::create_dir(&staging).await.unwrap();

        assert!(remove_staging_dir(&staging).await);
        assert!(!staging.exists());
    }

    #[tokio::test]
    async fn test_remove_staging_dir_tolerates_residue() {
        let parent = tempfile::tempdir().unwrap();
        let staging = parent.path().join("staging");
        tokio::fs::create_dir(&staging).await.unwrap();
        stage_file(&staging, "leftover", b"x").await;

        assert!(!remove_staging_dir(&staging).await);
        assert!(staging.join("leftover").exists());
    }
}
