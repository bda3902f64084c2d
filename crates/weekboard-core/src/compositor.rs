//! Overlap compositing for the weekly grid.
//!
//! Every source is expanded into day-local segments once per pass. For each
//! `(day, slot)` cell the compositor collects the segments starting in or
//! running through the slot, picks a single winner by source priority and
//! records whether anything else shares the cell.
//!
//! ## Cell labels
//!
//! - a segment starting in the slot shows `"<title> <kind>"`
//! - a segment running through the slot shows a continuation glyph
//! - more than one match adds an overlap marker to the winner
//! - the sleep source may carry a "wake in" countdown at the midpoint
//!   between now and the end of the current sleep
//! - an empty cell at the current slot shows a neutral now glyph

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

use crate::event::{weekday_index, ColorTag, EventSource, SourceTier};
use crate::expand::{expand, Segment, SegmentPart, SECS_PER_DAY};
use crate::occurrence::active_occurrence;

/// Continuation glyph for ordinary sources.
pub const CONTINUATION_GLYPH: &str = "│";
/// Continuation glyph for the sleep source.
pub const SLEEP_GLYPH: &str = "z";
/// Continuation glyph when other events share the cell.
pub const CONTINUATION_OVERLAP_GLYPH: &str = "╪";
/// Appended to a start label when other events share the cell.
pub const START_OVERLAP_MARK: &str = " ＋";
/// Shown in the current slot when nothing is scheduled there.
pub const NOW_GLYPH: &str = "•";

/// How a matching segment relates to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Start,
    Continuation,
}

/// A segment matched against one cell.
#[derive(Debug, Clone, Copy)]
pub struct SlotMatch<'a> {
    pub segment: Segment<'a>,
    pub placement: Placement,
    /// Position of the owning source in declaration order.
    pub source_index: usize,
}

/// One rendered cell of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridCell {
    pub label: String,
    pub color: Option<ColorTag>,
    pub tier: Option<SourceTier>,
    pub is_continuation: bool,
    pub has_overlap: bool,
    /// This cell is the current day and slot.
    pub is_now: bool,
    /// Number of segments that matched the cell.
    pub matches: usize,
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        self.matches == 0
    }
}

/// A row of seven cells sharing one slot start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub start: NaiveTime,
    pub cells: Vec<GridCell>,
}

/// The composed week, Monday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid {
    pub slot_minutes: u32,
    pub rows: Vec<GridRow>,
    pub now_day: u8,
    pub now_slot: usize,
}

impl WeekGrid {
    pub fn cell(&self, day: u8, slot: usize) -> Option<&GridCell> {
        self.rows.get(slot)?.cells.get(day as usize)
    }
}

/// Sleep countdown overlay position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeMarker {
    pub day: u8,
    pub slot: usize,
    pub label: String,
}

/// Label for the sleep countdown, `wake in HH:MM`.
pub fn wake_label(until_wake: Duration) -> String {
    let minutes = until_wake.num_minutes().max(0);
    format!("wake in {:02}:{:02}", minutes / 60, minutes % 60)
}

fn continuation_glyph(tier: SourceTier) -> &'static str {
    match tier {
        SourceTier::Sleep => SLEEP_GLYPH,
        _ => CONTINUATION_GLYPH,
    }
}

/// Resolves overlapping sources into single grid cells.
pub struct Compositor<'a> {
    sources: &'a [EventSource],
    segments: Vec<(usize, Segment<'a>)>,
    slot_secs: i64,
}

impl<'a> Compositor<'a> {
    /// Expand all sources with the given slot size.
    ///
    /// `sources` must be in declaration order; that order breaks priority
    /// ties. A zero slot size is treated as one minute.
    pub fn new(sources: &'a [EventSource], slot_minutes: u32) -> Self {
        let segments = sources
            .iter()
            .enumerate()
            .flat_map(|(idx, source)| {
                source
                    .events
                    .iter()
                    .flat_map(expand)
                    .map(move |seg| (idx, seg))
            })
            .collect();

        Self {
            sources,
            segments,
            slot_secs: i64::from(slot_minutes.max(1)) * 60,
        }
    }

    pub fn slot_minutes(&self) -> u32 {
        (self.slot_secs / 60) as u32
    }

    /// Number of rows covering one day.
    pub fn slots_per_day(&self) -> usize {
        ((SECS_PER_DAY + self.slot_secs - 1) / self.slot_secs) as usize
    }

    /// Index of the slot containing `t`.
    pub fn slot_of(&self, t: NaiveTime) -> usize {
        (i64::from(t.num_seconds_from_midnight()) / self.slot_secs) as usize
    }

    /// Every segment matching `(day, slot)`, in declaration order.
    pub fn matches(&self, day: u8, slot: usize) -> Vec<SlotMatch<'a>> {
        let t = slot as i64 * self.slot_secs;
        self.segments
            .iter()
            .filter(|(_, seg)| seg.weekday == day)
            .filter_map(|&(source_index, segment)| {
                let s = segment.start_secs();
                let starts_here =
                    segment.part != SegmentPart::Tail && (t..t + self.slot_secs).contains(&s);
                let placement = if starts_here {
                    Placement::Start
                } else if s <= t && t < segment.end_secs() {
                    Placement::Continuation
                } else {
                    return None;
                };
                Some(SlotMatch {
                    segment,
                    placement,
                    source_index,
                })
            })
            .collect()
    }

    /// Highest priority match; earlier declarations win ties.
    pub fn winner<'m>(matches: &'m [SlotMatch<'a>]) -> Option<&'m SlotMatch<'a>> {
        matches.iter().fold(None, |best: Option<&SlotMatch<'a>>, m| match best {
            Some(b) if b.segment.priority() >= m.segment.priority() => Some(b),
            _ => Some(m),
        })
    }

    /// Resolve one cell without the now or wake overlays.
    pub fn resolve(&self, day: u8, slot: usize) -> GridCell {
        let matches = self.matches(day, slot);
        let Some(win) = Self::winner(&matches) else {
            return GridCell::default();
        };

        let overlap = matches.len() > 1;
        let tier = win.segment.tier();
        let is_continuation = win.placement == Placement::Continuation;
        let label = match (win.placement, overlap) {
            (Placement::Start, false) => win.segment.event.label(),
            (Placement::Start, true) => format!("{}{}", win.segment.event.label(), START_OVERLAP_MARK),
            (Placement::Continuation, false) => continuation_glyph(tier).to_string(),
            (Placement::Continuation, true) => CONTINUATION_OVERLAP_GLYPH.to_string(),
        };
        let color = win
            .segment
            .event
            .color
            .or_else(|| self.sources.get(win.source_index).and_then(|s| s.color));

        GridCell {
            label,
            color,
            tier: Some(tier),
            is_continuation,
            has_overlap: overlap,
            is_now: false,
            matches: matches.len(),
        }
    }

    /// Where the sleep countdown goes, if `now` is inside a sleep window.
    ///
    /// The marker sits at the midpoint between `now` and the end of the
    /// whole sleep, even when that sleep was split at midnight.
    pub fn wake_marker(&self, now: NaiveDateTime) -> Option<WakeMarker> {
        let occ = self
            .sources
            .iter()
            .filter(|s| s.tier == SourceTier::Sleep)
            .flat_map(|s| s.events.iter())
            .find_map(|ev| active_occurrence(now, ev))?;

        let until_wake = occ.end - now;
        let midpoint = now + until_wake / 2;
        Some(WakeMarker {
            day: weekday_index(&midpoint),
            slot: self.slot_of(midpoint.time()),
            label: wake_label(until_wake),
        })
    }

    /// Compose the full week for `now`.
    pub fn compose(&self, now: NaiveDateTime) -> WeekGrid {
        let now_day = weekday_index(&now);
        let now_slot = self.slot_of(now.time());
        let marker = self.wake_marker(now);
        let sleep_color = self
            .sources
            .iter()
            .find(|s| s.tier == SourceTier::Sleep)
            .and_then(|s| s.color);

        let rows = (0..self.slots_per_day())
            .map(|slot| {
                let start = NaiveTime::from_num_seconds_from_midnight_opt(
                    (slot as i64 * self.slot_secs) as u32,
                    0,
                )
                .unwrap_or_default();
                let cells = (0..7u8)
                    .map(|day| {
                        let mut cell = self.resolve(day, slot);
                        cell.is_now = day == now_day && slot == now_slot;

                        let marked = marker
                            .as_ref()
                            .filter(|m| m.day == day && m.slot == slot)
                            .filter(|_| cell.is_empty() || cell.tier == Some(SourceTier::Sleep));
                        if let Some(m) = marked {
                            cell.label = m.label.clone();
                            cell.is_continuation = false;
                            if cell.is_empty() {
                                cell.tier = Some(SourceTier::Sleep);
                                cell.color = sleep_color;
                            }
                        } else if cell.is_now && cell.is_empty() {
                            cell.label = NOW_GLYPH.to_string();
                        }
                        cell
                    })
                    .collect();
                GridRow { start, cells }
            })
            .collect();

        debug!(
            segments = self.segments.len(),
            slot_minutes = self.slot_minutes(),
            "composed week grid"
        );

        WeekGrid {
            slot_minutes: self.slot_minutes(),
            rows,
            now_day,
            now_slot,
        }
    }

    /// Every label the grid could show, used to size columns.
    pub fn possible_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .segments
            .iter()
            .filter(|(_, seg)| seg.part != SegmentPart::Tail)
            .flat_map(|(_, seg)| {
                let base = seg.event.label();
                let overlapped = format!("{base}{START_OVERLAP_MARK}");
                [base, overlapped]
            })
            .collect();
        labels.extend(
            [
                CONTINUATION_GLYPH,
                SLEEP_GLYPH,
                CONTINUATION_OVERLAP_GLYPH,
                NOW_GLYPH,
            ]
            .iter()
            .map(|g| g.to_string()),
        );
        labels.push(wake_label(Duration::hours(23) + Duration::minutes(59)));
        labels.sort();
        labels.dedup();
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventId, RecurringEvent};
    use crate::expand::{sleep_events, SleepPlan};
    use chrono::NaiveDate;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        // 2026-10-12 is a Monday
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn ev(tier: SourceTier, index: usize, title: &str, day: u8, start: NaiveTime, minutes: i64) -> RecurringEvent {
        RecurringEvent::new(
            EventId::new(tier, index),
            title,
            "",
            day,
            start,
            Duration::minutes(minutes),
        )
    }

    fn slot(h: u32, m: u32) -> usize {
        ((h * 60 + m) / 30) as usize
    }

    #[test]
    fn start_then_continuation() {
        let sources = vec![EventSource::new(
            SourceTier::Class,
            vec![ev(SourceTier::Class, 0, "CEG 4166", 0, hm(13, 0), 80)],
        )];
        let comp = Compositor::new(&sources, 30);

        let start = comp.resolve(0, slot(13, 0));
        assert_eq!(start.label, "CEG 4166");
        assert!(!start.is_continuation);
        assert_eq!(start.color, Some(ColorTag::Blue));

        let cont = comp.resolve(0, slot(13, 30));
        assert_eq!(cont.label, CONTINUATION_GLYPH);
        assert!(cont.is_continuation);

        // 14:00 slot is still inside [13:00, 14:20)
        assert_eq!(comp.resolve(0, slot(14, 0)).label, CONTINUATION_GLYPH);
        assert!(comp.resolve(0, slot(14, 30)).is_empty());
        assert!(comp.resolve(1, slot(13, 0)).is_empty());
    }

    #[test]
    fn higher_priority_source_wins_and_marks_overlap() {
        let sources = vec![
            EventSource::new(
                SourceTier::Food,
                vec![ev(SourceTier::Food, 0, "Lunch", 0, hm(13, 0), 30)],
            ),
            EventSource::new(
                SourceTier::Class,
                vec![ev(SourceTier::Class, 0, "CEG 4166", 0, hm(13, 0), 80)],
            ),
        ];
        let comp = Compositor::new(&sources, 30);
        let cell = comp.resolve(0, slot(13, 0));
        assert_eq!(cell.label, format!("Lunch{START_OVERLAP_MARK}"));
        assert_eq!(cell.tier, Some(SourceTier::Food));
        assert!(cell.has_overlap);
        assert_eq!(cell.matches, 2);

        let next = comp.resolve(0, slot(13, 30));
        assert_eq!(next.label, CONTINUATION_GLYPH);
        assert!(!next.has_overlap);
        assert_eq!(next.tier, Some(SourceTier::Class));
    }

    #[test]
    fn continuation_with_overlap_uses_its_own_glyph() {
        let sources = vec![
            EventSource::new(
                SourceTier::Personal,
                vec![ev(SourceTier::Personal, 0, "Gym", 0, hm(12, 0), 120)],
            ),
            EventSource::new(
                SourceTier::Class,
                vec![ev(SourceTier::Class, 0, "CEG 4166", 0, hm(13, 0), 80)],
            ),
        ];
        let comp = Compositor::new(&sources, 30);
        let cell = comp.resolve(0, slot(13, 0));
        assert_eq!(cell.label, CONTINUATION_OVERLAP_GLYPH);
        assert!(cell.is_continuation);
        assert!(cell.has_overlap);
        assert_eq!(cell.tier, Some(SourceTier::Personal));
    }

    #[test]
    fn equal_priorities_keep_declaration_order() {
        let sources = vec![EventSource::new(
            SourceTier::Class,
            vec![
                ev(SourceTier::Class, 0, "First", 2, hm(9, 0), 60),
                ev(SourceTier::Class, 1, "Second", 2, hm(9, 0), 60),
            ],
        )];
        let comp = Compositor::new(&sources, 30);
        let cell = comp.resolve(2, slot(9, 0));
        assert!(cell.label.starts_with("First"));
        assert!(cell.has_overlap);
    }

    #[test]
    fn off_grid_start_is_labelled_in_its_slot() {
        let sources = vec![EventSource::new(
            SourceTier::Personal,
            vec![ev(SourceTier::Personal, 0, "Call", 3, hm(10, 15), 45)],
        )];
        let comp = Compositor::new(&sources, 30);
        assert_eq!(comp.resolve(3, slot(10, 0)).label, "Call");
        assert_eq!(comp.resolve(3, slot(10, 30)).label, CONTINUATION_GLYPH);
        assert!(comp.resolve(3, slot(11, 0)).is_empty());
    }

    #[test]
    fn split_sleep_tail_continues_rather_than_restarting() {
        let sleep = SleepPlan::default();
        let sources = vec![EventSource::new(SourceTier::Sleep, sleep_events(&sleep))];
        let comp = Compositor::new(&sources, 30);

        assert_eq!(comp.resolve(0, slot(23, 0)).label, "Sleep");
        assert_eq!(comp.resolve(0, slot(23, 30)).label, SLEEP_GLYPH);
        let midnight = comp.resolve(1, 0);
        assert_eq!(midnight.label, SLEEP_GLYPH);
        assert!(midnight.is_continuation);
        assert!(comp.resolve(1, slot(8, 30)).is_continuation);
        assert!(comp.resolve(1, slot(9, 0)).is_empty());
    }

    #[test]
    fn now_glyph_only_in_empty_current_cell() {
        let sources = vec![EventSource::new(
            SourceTier::Class,
            vec![ev(SourceTier::Class, 0, "CEG 4166", 0, hm(13, 0), 80)],
        )];
        let comp = Compositor::new(&sources, 30);

        let grid = comp.compose(at(12, 10, 17));
        let cell = grid.cell(0, slot(10, 0)).unwrap();
        assert!(cell.is_now);
        assert_eq!(cell.label, NOW_GLYPH);

        let grid = comp.compose(at(12, 13, 45));
        let cell = grid.cell(0, slot(13, 30)).unwrap();
        assert!(cell.is_now);
        assert_eq!(cell.label, CONTINUATION_GLYPH);
        assert_eq!(grid.rows.len(), 48);
    }

    #[test]
    fn wake_marker_sits_halfway_to_wake_up() {
        let sleep = SleepPlan::default(); // 23:00 -> 09:00
        let sources = vec![EventSource::new(SourceTier::Sleep, sleep_events(&sleep))];
        let comp = Compositor::new(&sources, 30);

        // Tue 01:00, 8h left, midpoint 05:00 Tue
        let marker = comp.wake_marker(at(13, 1, 0)).unwrap();
        assert_eq!(marker.day, 1);
        assert_eq!(marker.slot, slot(5, 0));
        assert_eq!(marker.label, "wake in 08:00");

        let grid = comp.compose(at(13, 1, 0));
        assert_eq!(grid.cell(1, slot(5, 0)).unwrap().label, "wake in 08:00");
        assert!(comp.wake_marker(at(13, 12, 0)).is_none());
    }

    #[test]
    fn wake_marker_crosses_midnight_from_the_head() {
        let sleep = SleepPlan::default();
        let sources = vec![EventSource::new(SourceTier::Sleep, sleep_events(&sleep))];
        let comp = Compositor::new(&sources, 30);
        // Mon 23:00, 10h left, midpoint Tue 04:00
        let marker = comp.wake_marker(at(12, 23, 0)).unwrap();
        assert_eq!((marker.day, marker.slot), (1, slot(4, 0)));
    }

    #[test]
    fn wake_marker_never_replaces_another_source() {
        let sleep = SleepPlan::default();
        let sources = vec![
            EventSource::new(
                SourceTier::Personal,
                vec![ev(SourceTier::Personal, 0, "Flight", 1, hm(5, 0), 30)],
            ),
            EventSource::new(SourceTier::Sleep, sleep_events(&sleep)),
        ];
        let comp = Compositor::new(&sources, 30);
        let grid = comp.compose(at(13, 1, 0));
        let cell = grid.cell(1, slot(5, 0)).unwrap();
        assert_eq!(cell.label, format!("Flight{START_OVERLAP_MARK}"));
    }

    #[test]
    fn possible_labels_cover_overlap_and_wake_forms() {
        let sources = vec![EventSource::new(
            SourceTier::Class,
            vec![ev(SourceTier::Class, 0, "CEG 4166", 0, hm(13, 0), 80)],
        )];
        let comp = Compositor::new(&sources, 30);
        let labels = comp.possible_labels();
        assert!(labels.contains(&"CEG 4166".to_string()));
        assert!(labels.contains(&format!("CEG 4166{START_OVERLAP_MARK}")));
        assert!(labels.contains(&"wake in 23:59".to_string()));
    }
}
