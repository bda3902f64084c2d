//! Occurrence resolution: mapping a wall-clock instant onto weekly events.
//!
//! All instants are naive local times in the dashboard's fixed zone. The
//! caller resolves the clock once per pass and hands the same `now` to every
//! function here, so repeated calls with the same instant agree.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::event::{weekday_index, RecurringEvent};

/// How far through an occurrence `now` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Beginning,
    Middle,
    End,
}

impl Stage {
    /// Bucket a progress fraction into thirds.
    pub fn from_progress(progress: f64) -> Self {
        if progress < 1.0 / 3.0 {
            Self::Beginning
        } else if progress < 2.0 / 3.0 {
            Self::Middle
        } else {
            Self::End
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Beginning => "beginning",
            Stage::Middle => "middle",
            Stage::End => "end",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete instance of a recurring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub event: &'a RecurringEvent,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl<'a> Occurrence<'a> {
    pub fn new(event: &'a RecurringEvent, start: NaiveDateTime) -> Self {
        Self {
            event,
            start,
            end: start + event.duration,
        }
    }

    /// Half-open containment: the end instant is outside.
    pub fn contains(&self, now: NaiveDateTime) -> bool {
        self.start <= now && now < self.end
    }

    /// Time until the occurrence ends, never negative.
    pub fn remaining(&self, now: NaiveDateTime) -> Duration {
        clamp_non_negative(self.end - now)
    }

    /// Time until the occurrence starts, never negative.
    pub fn until_start(&self, now: NaiveDateTime) -> Duration {
        clamp_non_negative(self.start - now)
    }

    /// Fraction of the occurrence elapsed at `now`, clamped to `[0, 1]`.
    ///
    /// A non-positive duration reports the midpoint.
    pub fn progress(&self, now: NaiveDateTime) -> f64 {
        let total = (self.end - self.start).num_milliseconds();
        if total <= 0 {
            return 0.5;
        }
        let elapsed = (now - self.start).num_milliseconds();
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn stage(&self, now: NaiveDateTime) -> Stage {
        if self.event.duration <= Duration::zero() {
            return Stage::Middle;
        }
        Stage::from_progress(self.progress(now))
    }
}

/// Negative spans collapse to zero.
pub fn clamp_non_negative(span: Duration) -> Duration {
    if span < Duration::zero() {
        Duration::zero()
    } else {
        span
    }
}

/// Start of the first occurrence of `event` strictly after `now`.
pub fn next_occurrence(now: NaiveDateTime, event: &RecurringEvent) -> NaiveDateTime {
    let days_ahead = (i64::from(event.weekday) - i64::from(weekday_index(&now))).rem_euclid(7);
    let candidate = (now.date() + Duration::days(days_ahead)).and_time(event.start);
    if candidate <= now {
        candidate + Duration::days(7)
    } else {
        candidate
    }
}

/// The soonest upcoming occurrence across `events`.
///
/// Equal starts resolve to the first event in slice order.
///
/// # Errors
/// Returns [`ValidationError::EmptyCollection`] when `events` is empty.
pub fn next_event<'a>(
    now: NaiveDateTime,
    events: &'a [RecurringEvent],
) -> Result<Occurrence<'a>, ValidationError> {
    events
        .iter()
        .map(|ev| Occurrence::new(ev, next_occurrence(now, ev)))
        .min_by_key(|occ| occ.start)
        .ok_or_else(|| ValidationError::EmptyCollection("class schedule".to_string()))
}

/// The occurrence of `events` running at `now`, if any.
///
/// Only events scheduled on `now`'s weekday are considered, each with
/// today's interval. When several contain `now`, the one that began most
/// recently wins; equal starts keep slice order.
pub fn current_event<'a>(now: NaiveDateTime, events: &'a [RecurringEvent]) -> Option<Occurrence<'a>> {
    let today = weekday_index(&now);
    events
        .iter()
        .filter(|ev| ev.weekday == today)
        .map(|ev| Occurrence::new(ev, now.date().and_time(ev.start)))
        .filter(|occ| occ.contains(now))
        .fold(None, |best: Option<Occurrence<'a>>, occ| match best {
            Some(b) if b.start >= occ.start => Some(b),
            _ => Some(occ),
        })
}

/// The occurrence of `event` containing `now`, including one that began on
/// an earlier day and runs past midnight.
pub fn active_occurrence(now: NaiveDateTime, event: &RecurringEvent) -> Option<Occurrence<'_>> {
    let days_back = (i64::from(weekday_index(&now)) - i64::from(event.weekday)).rem_euclid(7);
    let latest = (now.date() - Duration::days(days_back)).and_time(event.start);
    [latest, latest - Duration::days(7)]
        .into_iter()
        .map(|start| Occurrence::new(event, start))
        .find(|occ| occ.contains(now))
}

/// Most recent Monday at or before `now`, at midnight.
pub fn week_start(now: NaiveDateTime) -> NaiveDateTime {
    let back = i64::from(now.weekday().num_days_from_monday());
    (now.date() - Duration::days(back)).and_time(chrono::NaiveTime::default())
}
