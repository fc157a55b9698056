//! Configuration types for ftp-courier
//!
//! Settings are read from a JSON settings file whose keys are PascalCase for
//! compatibility with existing deployments (`Host`, `User`, `Password`,
//! `DownloadFolder`). Everything beyond those four required keys has a
//! default, so a minimal settings file keeps working as the crate grows.

use crate::error::{Error, Result};
use crate::scheduler::time_format;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Remote FTP endpoint settings (host, credentials)
///
/// Used as a nested sub-config within [`Settings`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteSettings {
    /// FTP server hostname
    pub host: String,

    /// FTP server port (default: 21)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Username for authentication
    pub user: String,

    /// Password for authentication
    pub password: String,
}

/// Local directory and eligibility settings for a transfer run
///
/// Used as a nested sub-config within [`Settings`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TransferSettings {
    /// Destination directory that accumulates transferred files across runs
    pub download_folder: PathBuf,

    /// Staging directory holding files mid-transfer (default: "./.temp")
    ///
    /// Created at the start of each run and removed at the end when empty.
    #[serde(default = "default_staging_folder")]
    pub staging_folder: PathBuf,

    /// Reserved remote names never treated as transferable payload
    /// (default: "frep", "input")
    #[serde(default = "default_exclusions")]
    pub exclusions: HashSet<String>,
}

/// Schedule settings
///
/// Used as a nested sub-config within [`Settings`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleSettings {
    /// Local time-of-day the daily run fires (HH:MM:SS, default: 20:00:00)
    #[serde(default = "default_daily_at", with = "time_format")]
    pub daily_at: NaiveTime,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            daily_at: default_daily_at(),
        }
    }
}

/// Main configuration for [`FtpCourier`](crate::FtpCourier)
///
/// Fields are organized into logical sub-configs:
/// - [`remote`](RemoteSettings) — host, port, credentials
/// - [`transfer`](TransferSettings) — destination, staging, exclusions
/// - [`schedule`](ScheduleSettings) — daily tick time
///
/// All sub-config fields are flattened for serialization, so the settings
/// file stays a single flat JSON object.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Remote endpoint settings
    #[serde(flatten)]
    pub remote: RemoteSettings,

    /// Transfer directory and eligibility settings
    #[serde(flatten)]
    pub transfer: TransferSettings,

    /// Schedule settings
    #[serde(flatten)]
    pub schedule: ScheduleSettings,
}

impl Settings {
    /// Load and validate settings from a JSON settings file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file is missing, unreadable, or
    /// malformed, or when a required value fails validation. No connection
    /// is attempted before settings load cleanly.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read(path).await.map_err(|e| {
            Error::config(
                format!("could not read settings file {}: {e}", path.display()),
                None,
            )
        })?;

        let settings: Settings = serde_json::from_slice(&raw).map_err(|e| {
            Error::config(
                format!("malformed settings file {}: {e}", path.display()),
                None,
            )
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings invariants
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if self.remote.host.is_empty() {
            return Err(Error::config("host must not be empty", Some("Host")));
        }
        if self.transfer.download_folder.as_os_str().is_empty() {
            return Err(Error::config(
                "download folder must not be empty",
                Some("DownloadFolder"),
            ));
        }
        if self.transfer.staging_folder == self.transfer.download_folder {
            return Err(Error::config(
                "staging folder must differ from the download folder",
                Some("StagingFolder"),
            ));
        }
        Ok(())
    }
}

fn default_port() -> u16 {
    21
}

fn default_staging_folder() -> PathBuf {
    PathBuf::from("./.temp")
}

fn default_exclusions() -> HashSet<String> {
    ["frep", "input"].into_iter().map(str::to_owned).collect()
}

fn default_daily_at() -> NaiveTime {
    // 20:00:00 is always a valid time-of-day
    NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default()
}
