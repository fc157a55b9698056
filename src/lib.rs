//! # ftp-courier
//!
//! Scheduled FTP file-transfer library: fetch the daily delta of partner
//! files from a remote FTP server and relocate them into a destination
//! directory.
//!
//! ## Design Philosophy
//!
//! ftp-courier is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Run-oriented** - One `run_once` call is one complete, idempotent pass
//! - **Resilient per file** - A bad file is logged and skipped, never fatal
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use ftp_courier::{FtpCourier, SchedulerTask, run_with_shutdown};
//! use ftp_courier::scheduler::DailySchedule;
//! use chrono::NaiveTime;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let courier = Arc::new(FtpCourier::from_settings_file("settings.json"));
//!
//!     // Subscribe to events
//!     let mut events = courier.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     // Fire once a day at 20:00 local time until SIGTERM/SIGINT
//!     let schedule = DailySchedule::new(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
//!     let task = SchedulerTask::new(courier, schedule, CancellationToken::new());
//!     run_with_shutdown(task).await;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Run orchestrator
pub mod courier;
/// Error types
pub mod error;
/// Delta download into staging
pub mod fetcher;
/// Relocation of staged files into the destination
pub mod relocator;
/// Remote endpoint capability (FTP and in-memory implementations)
pub mod remote;
/// Daily schedule evaluation
pub mod scheduler;
/// Scheduler task execution
pub mod scheduler_task;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{RemoteSettings, ScheduleSettings, Settings, TransferSettings};
pub use courier::FtpCourier;
pub use error::{Error, Result};
pub use remote::{FtpConnector, MemoryConnector, RemoteConnector, RemoteEndpoint};
pub use scheduler::DailySchedule;
pub use scheduler_task::SchedulerTask;
pub use types::{
    Event, FetchReport, FileOutcome, Phase, RelocateReport, RunOutcome, RunReport, SkipReason,
};

/// Helper function to run the scheduler task with graceful signal handling.
///
/// Spawns the task, waits for a termination signal, cancels the task's
/// shutdown token, and waits for the tick loop to wind down.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
pub async fn run_with_shutdown(task: SchedulerTask) {
    let shutdown = task.shutdown_token();
    let handle = tokio::spawn(task.run());

    wait_for_signal().await;
    shutdown.cancel();

    if let Err(e) = handle.await {
        tracing::error!(error = %e, "scheduler task terminated abnormally");
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
