//! Day availability for an enrollment.
//!
//! Availability is never stored: it is recomputed from the enrollment's
//! progress counters and the current clock on every read.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Minimum interval, in hours, between completing two consecutive days.
pub const UNLOCK_INTERVAL_HOURS: i64 = 24;

pub fn unlock_interval() -> Duration {
    Duration::hours(UNLOCK_INTERVAL_HOURS)
}

/// The subset of an enrollment that availability depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentProgress {
    pub completed_days_count: i32,
    pub current_day_number: i32,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    /// Day the user is expected to complete next (`total_days + 1` once finished).
    pub available_day: i32,
    /// Set only while `available_day` is still locked.
    pub next_unlock_at: Option<DateTime<Utc>>,
}

impl Availability {
    pub fn is_locked(&self) -> bool {
        self.next_unlock_at.is_some()
    }

    /// Whole seconds until the unlock, rounded up.
    pub fn seconds_until_unlock(&self, now: DateTime<Utc>) -> Option<i64> {
        self.next_unlock_at.map(|at| {
            let millis = (at - now).num_milliseconds().max(0);
            (millis + 999) / 1000
        })
    }
}

pub fn compute_availability(
    progress: &EnrollmentProgress,
    total_days: i32,
    now: DateTime<Utc>,
) -> Availability {
    if progress.finished_at.is_some() {
        return Availability {
            available_day: total_days + 1,
            next_unlock_at: None,
        };
    }

    if progress.current_day_number == 1 && progress.completed_days_count == 0 {
        return Availability {
            available_day: 1,
            next_unlock_at: None,
        };
    }

    let next_unlock_at = progress
        .last_completed_at
        .map(|at| at + unlock_interval())
        .filter(|unlock| now < *unlock);

    Availability {
        available_day: progress.current_day_number,
        next_unlock_at,
    }
}

/// Derived state of a single program day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Done,
    Available,
    Locked,
}

pub fn day_status(day_number: i32, is_completed: bool, availability: &Availability) -> DayStatus {
    if is_completed {
        DayStatus::Done
    } else if day_number == availability.available_day && !availability.is_locked() {
        DayStatus::Available
    } else {
        DayStatus::Locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn fresh() -> EnrollmentProgress {
        EnrollmentProgress {
            completed_days_count: 0,
            current_day_number: 1,
            last_completed_at: None,
            finished_at: None,
        }
    }

    fn after_day(day: i32, at: DateTime<Utc>) -> EnrollmentProgress {
        EnrollmentProgress {
            completed_days_count: day,
            current_day_number: day + 1,
            last_completed_at: Some(at),
            finished_at: None,
        }
    }

    #[test]
    fn day_one_is_immediately_available() {
        for offset in [0, 1, 10_000_000] {
            let now = t0() + Duration::seconds(offset);
            let availability = compute_availability(&fresh(), 5, now);
            assert_eq!(availability.available_day, 1);
            assert_eq!(availability.next_unlock_at, None);
        }
    }

    #[test]
    fn next_day_locked_inside_gate() {
        let progress = after_day(1, t0());
        let now = t0() + Duration::hours(23) + Duration::minutes(59);

        let availability = compute_availability(&progress, 5, now);

        assert_eq!(availability.available_day, 2);
        assert_eq!(availability.next_unlock_at, Some(t0() + Duration::hours(24)));
        assert_eq!(availability.seconds_until_unlock(now), Some(60));
    }

    #[test]
    fn next_day_unlocks_at_gate() {
        let progress = after_day(1, t0());

        let exactly = compute_availability(&progress, 5, t0() + Duration::hours(24));
        assert_eq!(exactly.available_day, 2);
        assert!(!exactly.is_locked());

        let later = compute_availability(&progress, 5, t0() + Duration::seconds(86_401));
        assert!(!later.is_locked());
        assert_eq!(later.seconds_until_unlock(t0()), None);
    }

    #[test]
    fn finished_enrollment_has_nothing_left() {
        let progress = EnrollmentProgress {
            completed_days_count: 3,
            current_day_number: 4,
            last_completed_at: Some(t0()),
            finished_at: Some(t0()),
        };

        let availability = compute_availability(&progress, 3, t0());

        assert_eq!(availability.available_day, 4);
        assert_eq!(availability.next_unlock_at, None);
    }

    #[test]
    fn missing_timestamp_does_not_lock() {
        let progress = EnrollmentProgress {
            completed_days_count: 2,
            current_day_number: 3,
            last_completed_at: None,
            finished_at: None,
        };

        let availability = compute_availability(&progress, 5, t0());
        assert_eq!(availability.available_day, 3);
        assert!(!availability.is_locked());
    }

    #[test]
    fn day_statuses_follow_completions_and_clock() {
        let progress = after_day(1, t0());
        let locked = compute_availability(&progress, 3, t0() + Duration::hours(1));
        assert_eq!(day_status(1, true, &locked), DayStatus::Done);
        assert_eq!(day_status(2, false, &locked), DayStatus::Locked);
        assert_eq!(day_status(3, false, &locked), DayStatus::Locked);

        let open = compute_availability(&progress, 3, t0() + Duration::hours(25));
        assert_eq!(day_status(2, false, &open), DayStatus::Available);
        assert_eq!(day_status(3, false, &open), DayStatus::Locked);
    }
}
