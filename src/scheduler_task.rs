//! Scheduler task driving daily transfer runs
//!
//! The task sleeps until the next tick of a [`DailySchedule`], invokes
//! [`FtpCourier::run_once`], and repeats. Runs are strictly sequential: the
//! next tick is computed only after the previous run finishes, so a run can
//! never overlap itself even if it outlasts its slot. The task exits
//! promptly when its cancellation token fires.
//!
//! # Example
//!
//! ```no_run
//! use ftp_courier::{FtpCourier, SchedulerTask};
//! use ftp_courier::scheduler::DailySchedule;
//! use chrono::NaiveTime;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let courier = Arc::new(FtpCourier::from_settings_file("settings.json"));
//! let schedule = DailySchedule::new(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
//! let task = SchedulerTask::new(courier, schedule, CancellationToken::new());
//!
//! tokio::spawn(async move {
//!     task.run().await;
//! });
//! # }
//! ```

use std::sync::Arc;

use chrono::Local;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::courier::FtpCourier;
use crate::scheduler::DailySchedule;
use crate::types::RunOutcome;

/// Background task invoking the courier once per scheduled day
pub struct SchedulerTask {
    courier: Arc<FtpCourier>,
    schedule: DailySchedule,
    shutdown: CancellationToken,
}

impl SchedulerTask {
    /// Create a scheduler task
    pub fn new(
        courier: Arc<FtpCourier>,
        schedule: DailySchedule,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            courier,
            schedule,
            shutdown,
        }
    }

    /// A clone of the task's cancellation token
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run the tick loop until cancelled
    ///
    /// Each iteration sleeps until the next scheduled occurrence, then
    /// awaits a full transfer run. However the run ends — completed with
    /// per-file failures, or aborted at a phase boundary — the loop
    /// continues to the next day's tick.
    pub async fn run(self) {
        info!(at = %self.schedule.at(), "scheduler task started");

        loop {
            let wait = self.schedule.until_next(Local::now());
            debug!(seconds = wait.as_secs(), "sleeping until next scheduled run");

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("scheduler task shutting down");
                    break;
                }
                _ = sleep(wait) => {}
            }

            match self.courier.run_once().await {
                RunOutcome::Completed(report) => {
                    debug!(
                        fetched = report.fetch.fetched_count(),
                        moved = report.relocate.moved_count(),
                        "scheduled run finished"
                    );
                }
                RunOutcome::AbortedAt { phase, error } => {
                    warn!(phase = %phase, error = %error, "scheduled run aborted, will retry at next tick");
                }
            }
        }

        info!("scheduler task stopped");
    }
}
