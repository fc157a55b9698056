//! Delta download of remote files into the staging directory
//!
//! A remote file is downloaded iff it is neither already present in the
//! destination directory nor on the exclusion list. Failures are isolated
//! per file: one bad download is recorded and logged, and the loop moves on
//! to the next file.

use std::collections::HashSet;
use std::path::Path;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::error::Result;
use crate::remote::RemoteEndpoint;
use crate::types::{Event, FetchReport, FileOutcome, SkipReason};

/// Download every eligible remote file into `staging_dir`
///
/// Eligibility: not in `already_present` and not in `exclusions`. Each
/// eligible file is retrieved in full and written into staging, overwriting
/// any leftover of the same name. The returned report carries one outcome
/// per listed file, in listing order.
pub async fn fetch(
    endpoint: &mut dyn RemoteEndpoint,
    remote_files: &[String],
    already_present: &HashSet<String>,
    exclusions: &HashSet<String>,
    staging_dir: &Path,
    event_tx: &broadcast::Sender<Event>,
) -> FetchReport {
    let mut outcomes = Vec::with_capacity(remote_files.len());

    for name in remote_files {
        if exclusions.contains(name) {
            outcomes.push(FileOutcome::Skipped {
                name: name.clone(),
                reason: SkipReason::Excluded,
            });
            continue;
        }
        if already_present.contains(name) {
            outcomes.push(FileOutcome::Skipped {
                name: name.clone(),
                reason: SkipReason::AlreadyPresent,
            });
            continue;
        }

        info!(file = %name, "downloading");
        match fetch_one(endpoint, name, staging_dir).await {
            Ok(()) => {
                info!(file = %name, "downloaded");
                event_tx.send(Event::FileFetched { name: name.clone() }).ok();
                outcomes.push(FileOutcome::Done { name: name.clone() });
            }
            Err(e) => {
                warn!(file = %name, error = %e, "failed to download file");
                event_tx
                    .send(Event::FileFetchFailed {
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

    FetchReport { outcomes }
}

/// Retrieve one file and write it into staging
async fn fetch_one(
    endpoint: &mut dyn RemoteEndpoint,
    name: &str,
    staging_dir: &Path,
) -> Result<()> {
    let payload = endpoint.retrieve(name).await?;
    tokio::fs::write(staging_dir.join(name), payload).await?;
    Ok(())
}
