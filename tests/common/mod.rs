//! Common test utilities for ftp-courier end-to-end tests

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveTime;
use ftp_courier::{
    FtpCourier, RemoteSettings, ScheduleSettings, Settings, TransferSettings,
};
use tempfile::TempDir;

/// Temp-dir backed run environment: destination, staging, settings
pub struct TransferFixture {
    /// Keeps the temp tree alive for the duration of the test
    pub root: TempDir,
    /// Destination directory (exists up front)
    pub destination: PathBuf,
    /// Staging directory (not created; the run creates it)
    pub staging: PathBuf,
}

impl TransferFixture {
    /// Fresh destination/staging pair under one temp root
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let destination = root.path().join("incoming");
        let staging = root.path().join(".temp");
        std::fs::create_dir(&destination).unwrap();
        Self {
            root,
            destination,
            staging,
        }
    }

    /// Settings pointing at this fixture's directories, default exclusions
    pub fn settings(&self) -> Settings {
        Settings {
            remote: RemoteSettings {
                host: "ftp.partner.example".into(),
                port: 21,
                user: "courier".into(),
                password: "hunter2".into(),
            },
            transfer: TransferSettings {
                download_folder: self.destination.clone(),
                staging_folder: self.staging.clone(),
                exclusions: ["frep", "input"].into_iter().map(str::to_owned).collect(),
            },
            schedule: ScheduleSettings {
                daily_at: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            },
        }
    }

    /// Courier over these settings and the given connector
    pub fn courier(&self, connector: Arc<dyn ftp_courier::RemoteConnector>) -> FtpCourier {
        FtpCourier::new(self.settings()).with_connector(connector)
    }

    /// Pre-populate a destination file, as if transferred on an earlier run
    pub fn seed_destination(&self, name: &str, content: &[u8]) {
        std::fs::write(self.destination.join(name), content).unwrap();
    }

    /// Plain file names currently in the destination directory
    pub fn destination_names(&self) -> HashSet<String> {
        dir_names(&self.destination)
    }
}

/// Plain file names in a directory; empty set if the directory is missing
pub fn dir_names(dir: &Path) -> HashSet<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => HashSet::new(),
    }
}
