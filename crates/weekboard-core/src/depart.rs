//! One-shot departure planning for an arbitrary target time.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::occurrence::clamp_non_negative;

/// The next instant strictly after `now` whose wall-clock time is `target`.
pub fn next_datetime_for_time(now: NaiveDateTime, target: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(target);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// When to leave to arrive at `target` with `lead` to spare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeparturePlan {
    pub now: NaiveDateTime,
    pub target: NaiveDateTime,
    pub depart: NaiveDateTime,
    /// Zero once the departure time has passed.
    pub until_depart: Duration,
    pub leave_now: bool,
}

impl DeparturePlan {
    pub fn new(now: NaiveDateTime, target: NaiveTime, lead: Duration) -> Self {
        let target = next_datetime_for_time(now, target);
        let depart = target - lead;
        Self {
            now,
            target,
            depart,
            until_depart: clamp_non_negative(depart - now),
            leave_now: depart <= now,
        }
    }
}
