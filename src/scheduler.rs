//! Daily schedule evaluation for transfer runs.
//!
//! A [`DailySchedule`] fires once per day at a fixed local time-of-day.
//! It only answers "when is the next tick?" — actually sleeping until that
//! tick and invoking the run is the job of
//! [`SchedulerTask`](crate::scheduler_task::SchedulerTask).
//!
//! # Example
//!
//! ```rust
//! use ftp_courier::scheduler::DailySchedule;
//! use chrono::{Local, NaiveTime};
//!
//! let schedule = DailySchedule::new(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
//! let wait = schedule.until_next(Local::now());
//! assert!(wait <= std::time::Duration::from_secs(24 * 60 * 60));
//! ```

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A once-per-day schedule at a fixed local time
///
/// The tick instant itself belongs to the *next* day: asking for the next
/// occurrence at exactly the scheduled time rolls over, so a run triggered
/// at the tick cannot fire twice for the same day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySchedule {
    /// Local time-of-day the transfer run fires (HH:MM:SS, 24-hour format)
    #[serde(with = "time_format")]
    at: NaiveTime,
}

impl DailySchedule {
    /// Create a schedule firing daily at the given local time
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    /// The configured time-of-day
    pub fn at(&self) -> NaiveTime {
        self.at
    }

    /// Next occurrence of the scheduled time, in naive local time
    ///
    /// Returns today's tick if it is still ahead of `now`, otherwise
    /// tomorrow's. Evaluated in naive local time; a DST shift moves the
    /// wall-clock tick with it, and the task loop re-evaluates after every
    /// sleep anyway.
    pub fn next_occurrence(&self, now: DateTime<Local>) -> NaiveDateTime {
        let today = now.date_naive().and_time(self.at);
        if today > now.naive_local() {
            today
        } else {
            today + TimeDelta::days(1)
        }
    }

    /// Time remaining until the next occurrence
    pub fn until_next(&self, now: DateTime<Local>) -> std::time::Duration {
        (self.next_occurrence(now) - now.naive_local())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }
}

/// Serde module for serializing/deserializing NaiveTime as HH:MM:SS strings
pub(crate) mod time_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = time.format("%H:%M:%S").to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M:%S").map_err(serde::de::Error::custom)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn local(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local::now()
            .with_hour(h)
            .unwrap()
            .with_minute(m)
            .unwrap()
            .with_second(s)
            .unwrap()
            .with_nanosecond(0)
            .unwrap()
    }

    #[test]
    fn test_next_occurrence_later_today() {
        let schedule = DailySchedule::new(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        let now = local(10, 0, 0);

        let next = schedule.next_occurrence(now);
        assert_eq!(next.date(), now.date_naive());
        assert_eq!(next.time(), NaiveTime::from_hms_opt(20, 0, 0).unwrap());
    }

    #[test]
    fn test_next_occurrence_rolls_to_tomorrow() {
        let schedule = DailySchedule::new(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        let now = local(21, 30, 0);

        let next = schedule.next_occurrence(now);
        assert_eq!(next.date(), now.date_naive() + TimeDelta::days(1));
        assert_eq!(next.time(), NaiveTime::from_hms_opt(20, 0, 0).unwrap());
    }

    #[test]
    fn test_next_occurrence_at_exact_tick_rolls_over() {
        let schedule = DailySchedule::new(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        let now = local(20, 0, 0);

        // Exactly at the tick: next occurrence is tomorrow, never "now again"
        let next = schedule.next_occurrence(now);
        assert_eq!(next.date(), now.date_naive() + TimeDelta::days(1));
    }

    #[test]
    fn test_next_occurrence_one_second_before_tick() {
        let schedule = DailySchedule::new(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        let now = local(19, 59, 59);

        let next = schedule.next_occurrence(now);
        assert_eq!(next.date(), now.date_naive());
    }

    #[test]
    fn test_until_next_is_at_most_a_day() {
        let schedule = DailySchedule::new(NaiveTime::from_hms_opt(3, 30, 0).unwrap());
        let wait = schedule.until_next(Local::now());

        assert!(wait <= std::time::Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn test_until_next_exact_distance() {
        let schedule = DailySchedule::new(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        let now = local(11, 0, 0);

        assert_eq!(
            schedule.until_next(now),
            std::time::Duration::from_secs(60 * 60)
        );
    }

    #[test]
    fn test_schedule_serialization_round_trip() {
        let schedule = DailySchedule::new(NaiveTime::from_hms_opt(20, 0, 0).unwrap());

        let json = serde_json::to_string(&schedule).unwrap();
        assert!(json.contains("20:00:00"));

        let deserialized: DailySchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(schedule, deserialized);
    }

    #[test]
    fn test_time_format_rejects_garbage() {
        let result: Result<DailySchedule, _> = serde_json::from_str(r#"{"at":"8pm"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_next_occurrence_with_fixed_reference_date() {
        // Pin a concrete date so the rollover math is checked end to end
        let schedule = DailySchedule::new(NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        let now = Local
            .with_ymd_and_hms(2026, 3, 10, 7, 0, 0)
            .single()
            .expect("unambiguous local time");

        let next = schedule.next_occurrence(now);
        assert_eq!(
            next,
            NaiveDateTime::new(
                chrono::NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
                NaiveTime::from_hms_opt(6, 0, 0).unwrap()
            )
        );
    }
}
