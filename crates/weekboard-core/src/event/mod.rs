//! Event model: recurring weekly events, one-off deadlines and the sources
//! that group them.
//!
//! Everything here is plain data. Events are built once from configuration
//! and never mutated; derived events (sleep, morning routine) are regenerated
//! from their declarative settings by [`crate::expand`].

pub mod time;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub use time::{
    day_name, format_clock, format_countdown, parse_time_of_day, parse_timestamp,
    weekday_index,
};

/// Source tier an event belongs to.
///
/// The tier decides overlap precedence in the weekly grid. Declaration order
/// here is the tie-break order for equal priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    Personal,
    Food,
    Class,
    Sleep,
    Morning,
}

impl SourceTier {
    /// All tiers in declaration order.
    pub const ALL: [SourceTier; 5] = [
        SourceTier::Personal,
        SourceTier::Food,
        SourceTier::Class,
        SourceTier::Sleep,
        SourceTier::Morning,
    ];

    /// Priority used to resolve grid conflicts (higher wins).
    pub fn priority(&self) -> i32 {
        match self {
            SourceTier::Personal => 3,
            SourceTier::Food => 2,
            SourceTier::Class => 1,
            SourceTier::Sleep | SourceTier::Morning => 0,
        }
    }

    /// Get a short name for the tier.
    pub fn name(&self) -> &'static str {
        match self {
            SourceTier::Personal => "personal",
            SourceTier::Food => "food",
            SourceTier::Class => "class",
            SourceTier::Sleep => "sleep",
            SourceTier::Morning => "morning",
        }
    }

    /// Default background color for events of this tier.
    pub fn default_color(&self) -> Option<ColorTag> {
        match self {
            SourceTier::Personal => Some(ColorTag::Magenta),
            SourceTier::Food => Some(ColorTag::Yellow),
            SourceTier::Class => Some(ColorTag::Blue),
            SourceTier::Sleep => Some(ColorTag::Grey),
            SourceTier::Morning => Some(ColorTag::Cyan),
        }
    }
}

/// Background color tag carried by a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Grey,
}

/// Stable identity of a configured event.
///
/// Both halves of a midnight-split event share the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId {
    pub tier: SourceTier,
    pub index: usize,
}

impl EventId {
    pub fn new(tier: SourceTier, index: usize) -> Self {
        Self { tier, index }
    }
}

/// A weekly recurring event.
///
/// An occurrence in a given week is the half-open interval
/// `[date_for(weekday) + start, + duration)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringEvent {
    pub id: EventId,
    pub title: String,
    pub kind: String,
    pub location: String,
    /// 0 = Monday ... 6 = Sunday
    pub weekday: u8,
    pub start: NaiveTime,
    pub duration: Duration,
    pub color: Option<ColorTag>,
    pub priority: i32,
}

impl RecurringEvent {
    /// Build an event with the tier's default color and priority.
    pub fn new(
        id: EventId,
        title: impl Into<String>,
        kind: impl Into<String>,
        weekday: u8,
        start: NaiveTime,
        duration: Duration,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            kind: kind.into(),
            location: String::new(),
            weekday,
            start,
            duration,
            color: id.tier.default_color(),
            priority: id.tier.priority(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_color(mut self, color: Option<ColorTag>) -> Self {
        self.color = color;
        self
    }

    /// Grid label shown in the slot where the event starts.
    pub fn label(&self) -> String {
        if self.kind.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.kind)
        }
    }
}

/// A one-off item due at an absolute instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineItem {
    pub title: String,
    pub kind: String,
    pub due_at: NaiveDateTime,
}

impl DeadlineItem {
    pub fn new(title: impl Into<String>, kind: impl Into<String>, due_at: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            kind: kind.into(),
            due_at,
        }
    }
}

/// A named, priority-ranked collection of recurring events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSource {
    pub tier: SourceTier,
    pub color: Option<ColorTag>,
    pub priority: i32,
    pub events: Vec<RecurringEvent>,
}

impl EventSource {
    pub fn new(tier: SourceTier, events: Vec<RecurringEvent>) -> Self {
        Self {
            tier,
            color: tier.default_color(),
            priority: tier.priority(),
            events,
        }
    }
}
