//! Midnight expansion and derived-event generation.
//!
//! A weekly event whose end runs past 24:00 of its weekday is split into a
//! head segment on its own day and a tail segment starting at 00:00 on the
//! following day. Both segments point back at the same [`RecurringEvent`],
//! so anything keyed by [`EventId`] treats them as one logical event.
//!
//! Sleep and morning-routine events are not listed in configuration; they
//! are generated here from a small declarative plan on every render pass.

use chrono::{Duration, NaiveTime, Timelike};

use crate::event::{ColorTag, EventId, RecurringEvent, SourceTier};

pub const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Which part of its logical event a segment covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPart {
    /// The event fits inside its weekday.
    Whole,
    /// Portion before midnight, on the event's own weekday.
    Head,
    /// Portion after midnight, on the following weekday.
    Tail,
}

/// A day-local slice of a recurring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub event: &'a RecurringEvent,
    pub weekday: u8,
    pub start: NaiveTime,
    pub duration: Duration,
    pub part: SegmentPart,
}

impl<'a> Segment<'a> {
    pub fn id(&self) -> EventId {
        self.event.id
    }

    pub fn priority(&self) -> i32 {
        self.event.priority
    }

    pub fn tier(&self) -> SourceTier {
        self.event.id.tier
    }

    /// Start offset from midnight, in seconds.
    pub fn start_secs(&self) -> i64 {
        i64::from(self.start.num_seconds_from_midnight())
    }

    /// End offset from midnight, in seconds. At most one full day.
    pub fn end_secs(&self) -> i64 {
        (self.start_secs() + self.duration.num_seconds()).min(SECS_PER_DAY)
    }
}

/// Split `event` at midnight when its end would pass 24:00.
///
/// Returns one segment when the event fits its day, two otherwise. An event
/// ending exactly at 24:00 is not split.
pub fn expand(event: &RecurringEvent) -> Vec<Segment<'_>> {
    let start_secs = i64::from(event.start.num_seconds_from_midnight());
    let total = event.duration;

    if start_secs + total.num_seconds() <= SECS_PER_DAY {
        return vec![Segment {
            event,
            weekday: event.weekday,
            start: event.start,
            duration: total,
            part: SegmentPart::Whole,
        }];
    }

    let head = Duration::seconds(SECS_PER_DAY - start_secs);
    vec![
        Segment {
            event,
            weekday: event.weekday,
            start: event.start,
            duration: head,
            part: SegmentPart::Head,
        },
        Segment {
            event,
            weekday: (event.weekday + 1) % 7,
            start: NaiveTime::default(),
            duration: total - head,
            part: SegmentPart::Tail,
        },
    ]
}

/// Declarative nightly sleep block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepPlan {
    pub enabled: bool,
    pub start: NaiveTime,
    pub duration: Duration,
    pub title: String,
    pub kind: String,
    pub color: Option<ColorTag>,
}

impl Default for SleepPlan {
    fn default() -> Self {
        Self {
            enabled: true,
            start: NaiveTime::from_hms_opt(23, 0, 0).unwrap_or_default(),
            duration: Duration::hours(10),
            title: "Sleep".to_string(),
            kind: String::new(),
            color: SourceTier::Sleep.default_color(),
        }
    }
}

impl SleepPlan {
    /// Weekday and time at which the sleep that began on `weekday` ends.
    pub fn wake_point(&self, weekday: u8) -> (u8, NaiveTime) {
        let end = i64::from(self.start.num_seconds_from_midnight()) + self.duration.num_seconds();
        let days_later = end.div_euclid(SECS_PER_DAY);
        let secs = end.rem_euclid(SECS_PER_DAY);
        let wake_day = (i64::from(weekday) + days_later).rem_euclid(7) as u8;
        let wake_time =
            NaiveTime::from_num_seconds_from_midnight_opt(secs as u32, 0).unwrap_or_default();
        (wake_day, wake_time)
    }
}

/// Declarative morning routine starting when sleep ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorningPlan {
    pub enabled: bool,
    pub duration: Duration,
    pub title: String,
    pub kind: String,
    pub color: Option<ColorTag>,
}

impl Default for MorningPlan {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: Duration::hours(1),
            title: "Morning".to_string(),
            kind: "routine".to_string(),
            color: SourceTier::Morning.default_color(),
        }
    }
}

/// One sleep event per weekday, starting on that weekday.
pub fn sleep_events(plan: &SleepPlan) -> Vec<RecurringEvent> {
    if !plan.enabled {
        return Vec::new();
    }
    (0..7u8)
        .map(|day| {
            RecurringEvent::new(
                EventId::new(SourceTier::Sleep, day as usize),
                plan.title.clone(),
                plan.kind.clone(),
                day,
                plan.start,
                plan.duration,
            )
            .with_color(plan.color)
        })
        .collect()
}

/// One morning routine per night of sleep, starting at the wake point.
///
/// The routine can itself cross midnight and is expanded like any other
/// event.
pub fn morning_events(sleep: &SleepPlan, plan: &MorningPlan) -> Vec<RecurringEvent> {
    if !plan.enabled {
        return Vec::new();
    }
    (0..7u8)
        .map(|night| {
            let (day, start) = sleep.wake_point(night);
            RecurringEvent::new(
                EventId::new(SourceTier::Morning, night as usize),
                plan.title.clone(),
                plan.kind.clone(),
                day,
                start,
                plan.duration,
            )
            .with_color(plan.color)
        })
        .collect()
}
