//! Dashboard frame composition.
//!
//! A [`Dashboard`] is the long-lived renderer the driver loop owns. Each call
//! to [`Dashboard::render`] is a pure function of `now` and the schedule,
//! except for the phrase memory, which only changes when the current class
//! or its progress stage changes.

mod phrase;

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::compositor::Compositor;
use crate::deadline::DeadlineBoard;
use crate::error::Result;
use crate::event::{day_name, format_clock, format_countdown, weekday_index};
use crate::grid::GridRenderer;
use crate::occurrence::{current_event, next_event, Occurrence};
use crate::schedule::Schedule;
use crate::width::{display_width, pad_to_width};

pub use phrase::{FlavorText, PhraseMemory};

pub const NO_CLASS_MESSAGE: &str = "No class in session.";

/// One fully rendered screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub status: Vec<String>,
    pub info_box: String,
    pub grid: String,
    pub deadlines: String,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.status {
            writeln!(f, "{line}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.info_box)?;
        writeln!(f)?;
        writeln!(f, "{}", self.grid)?;
        writeln!(f)?;
        write!(f, "{}", self.deadlines)
    }
}

/// Countdowns derived from the next class.
///
/// Departure is the time until the next class minus the departure lead;
/// departure with lunch subtracts the lunch lead on top of that.
pub fn status_lines(
    now: NaiveDateTime,
    zone: &str,
    next: &Occurrence<'_>,
    departure_lead: Duration,
    lunch_lead: Duration,
) -> Vec<String> {
    let until = next.start - now;
    let departure = until - departure_lead;
    let with_lunch = departure - lunch_lead;

    vec![
        format!("Now:        {} {}", now.format("%a %Y-%m-%d %H:%M:%S"), zone)
            .trim_end()
            .to_string(),
        format!(
            "Next class: {} @ {} {}",
            next.event.label(),
            day_name(weekday_index(&next.start)),
            format_clock(next.start.time())
        ),
        format!("Time left:  {} (HH:MM:SS)", format_countdown(until)),
        format!("Departure:  {} (HH:MM:SS)", format_countdown(departure)),
        format!(
            "Departure with Lunch: {} (HH:MM:SS)",
            format_countdown(with_lunch)
        ),
    ]
}

/// Draw `lines` inside a box, padding by display width.
pub fn boxed(lines: &[String]) -> String {
    let inner = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
    let bar = "─".repeat(inner + 2);
    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(format!("┌{bar}┐"));
    for line in lines {
        out.push(format!("│ {} │", pad_to_width(line, inner)));
    }
    out.push(format!("└{bar}┘"));
    out.join("\n")
}

/// Info box for the class in session, or the explicit none message.
pub fn info_box(current: Option<&Occurrence<'_>>, now: NaiveDateTime, phrase: Option<&str>) -> String {
    let Some(occ) = current else {
        return boxed(&[NO_CLASS_MESSAGE.to_string()]);
    };

    let ev = occ.event;
    let mut lines = vec![format!("In session: {}", ev.label())];
    if !ev.location.is_empty() {
        lines.push(format!("Where:      {}", ev.location));
    }
    lines.push(format!(
        "Time:       {} - {}",
        format_clock(occ.start.time()),
        format_clock(occ.end.time())
    ));
    lines.push(format!("Remaining:  {}", format_countdown(occ.remaining(now))));
    lines.push(format!(
        "Progress:   {:.0}% ({})",
        occ.progress(now) * 100.0,
        occ.stage(now)
    ));
    if let Some(phrase) = phrase {
        lines.push(phrase.to_string());
    }
    boxed(&lines)
}

/// Long-lived renderer owning the schedule and the phrase memory.
pub struct Dashboard {
    schedule: Schedule,
    phrases: PhraseMemory,
    rng: StdRng,
    colorize: bool,
}

impl Dashboard {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            phrases: PhraseMemory::new(),
            rng: StdRng::from_entropy(),
            colorize: false,
        }
    }

    /// Deterministic phrase selection.
    pub fn with_seed(schedule: Schedule, seed: u64) -> Self {
        Self {
            schedule,
            phrases: PhraseMemory::new(),
            rng: StdRng::seed_from_u64(seed),
            colorize: false,
        }
    }

    pub fn colorize(mut self, on: bool) -> Self {
        self.colorize = on;
        self
    }

    pub fn last_phrase(&self) -> Option<&str> {
        self.phrases.last()
    }

    /// Render every block for `now`. `zone` is the time zone abbreviation
    /// printed on the first status line.
    ///
    /// # Errors
    /// Fails only when the class schedule is empty.
    pub fn render(&mut self, now: NaiveDateTime, zone: &str) -> Result<Frame> {
        let classes = self.schedule.class_events();
        let next = next_event(now, classes)?;
        let current = current_event(now, classes);

        let phrase = match &current {
            Some(occ) => self
                .phrases
                .phrase(occ.event.id, occ.stage(now), &self.schedule.flavor, &mut self.rng)
                .map(str::to_owned),
            None => {
                self.phrases.clear();
                None
            }
        };

        let status = status_lines(
            now,
            zone,
            &next,
            self.schedule.departure_lead,
            self.schedule.lunch_lead,
        );
        let info_box = info_box(current.as_ref(), now, phrase.as_deref());

        let sources = self.schedule.sources();
        let compositor = Compositor::new(&sources, self.schedule.slot_minutes);
        let week = compositor.compose(now);
        let grid = GridRenderer::new(self.schedule.min_column_width, self.colorize)
            .render(&week, &compositor.possible_labels());

        let deadlines = DeadlineBoard::build(
            &self.schedule.deadlines,
            now,
            self.schedule.max_deadlines_per_day,
        )
        .render(self.schedule.min_column_width);

        Ok(Frame {
            status,
            info_box,
            grid,
            deadlines,
        })
    }
}
