//! Deadline table: one-off items bucketed into this week and next week.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::event::{day_name, format_clock, DeadlineItem};
use crate::occurrence::week_start;
use crate::width::{max_width, pad_to_width};
use crate::grid::COLUMN_SEPARATOR;

pub const DEFAULT_MAX_PER_DAY: usize = 3;
const LOOKAHEAD_DAYS: usize = 14;
const WEEK_LABELS: [&str; 2] = ["This week", "Next week"];

/// Deadlines placed on the 14 days starting at this week's Monday.
#[derive(Debug, Clone)]
pub struct DeadlineBoard<'a> {
    pub first_day: NaiveDate,
    /// 14 day cells, Monday of this week first.
    pub days: Vec<Vec<&'a DeadlineItem>>,
    /// Items that fell in the window but exceeded the per-day limit.
    pub dropped: usize,
}

impl<'a> DeadlineBoard<'a> {
    /// Bucket `items` by due date.
    ///
    /// Items outside the window are ignored. Each day keeps its earliest
    /// `max_per_day` items; the rest are not shown.
    pub fn build(items: &'a [DeadlineItem], now: NaiveDateTime, max_per_day: usize) -> Self {
        let first_day = week_start(now).date();
        let mut days: Vec<Vec<&'a DeadlineItem>> = vec![Vec::new(); LOOKAHEAD_DAYS];

        for item in items {
            let offset = (item.due_at.date() - first_day).num_days();
            if (0..LOOKAHEAD_DAYS as i64).contains(&offset) {
                days[offset as usize].push(item);
            }
        }

        let mut dropped = 0;
        for day in &mut days {
            day.sort_by_key(|item| item.due_at);
            if day.len() > max_per_day {
                dropped += day.len() - max_per_day;
                day.truncate(max_per_day);
            }
        }
        if dropped > 0 {
            debug!(dropped, max_per_day, "deadline cells overflowed");
        }

        Self {
            first_day,
            days,
            dropped,
        }
    }

    pub fn this_week(&self) -> &[Vec<&'a DeadlineItem>] {
        &self.days[..7]
    }

    pub fn next_week(&self) -> &[Vec<&'a DeadlineItem>] {
        &self.days[7..]
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    /// Date shown in the header for cell `index`.
    pub fn date_of(&self, index: usize) -> NaiveDate {
        self.first_day + Duration::days(index as i64)
    }

    /// Render both weeks as a text table.
    pub fn render(&self, min_column_width: usize) -> String {
        let headers: Vec<String> = (0..LOOKAHEAD_DAYS)
            .map(|i| format!("{} {}", day_name((i % 7) as u8), self.date_of(i).format("%m/%d")))
            .collect();
        let entries: Vec<Vec<String>> = self
            .days
            .iter()
            .map(|day| day.iter().map(|item| item_label(item)).collect())
            .collect();

        let width = max_width(
            headers
                .iter()
                .chain(entries.iter().flatten())
                .map(String::as_str),
            min_column_width,
        );
        let gutter = max_width(WEEK_LABELS, 0);

        let mut lines = vec![pad_to_width("Deadlines", gutter)];
        for (week, label) in WEEK_LABELS.iter().enumerate() {
            let range = week * 7..week * 7 + 7;

            let mut header = pad_to_width(label, gutter);
            for i in range.clone() {
                header.push_str(COLUMN_SEPARATOR);
                header.push_str(&pad_to_width(&headers[i], width));
            }
            lines.push(header);

            let rows = entries[range.clone()].iter().map(Vec::len).max().unwrap_or(0).max(1);
            for row in 0..rows {
                let mut line = " ".repeat(gutter);
                for day in &entries[range.clone()] {
                    line.push_str(COLUMN_SEPARATOR);
                    let text = day.get(row).map(String::as_str).unwrap_or("");
                    line.push_str(&pad_to_width(text, width));
                }
                lines.push(line);
            }
        }

        lines.join("\n")
    }
}

fn item_label(item: &DeadlineItem) -> String {
    let clock = format_clock(item.due_at.time());
    if item.kind.is_empty() {
        format!("{clock} {}", item.title)
    } else {
        format!("{clock} {} {}", item.title, item.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::display_width;

    fn at(month: u32, day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, month, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn item(title: &str, due: NaiveDateTime) -> DeadlineItem {
        DeadlineItem::new(title, "", due)
    }

    #[test]
    fn buckets_into_this_and_next_week() {
        // now: Wednesday 2026-10-14; window is Mon 10/12 .. Sun 10/25
        let items = vec![
            item("past monday", at(10, 12, 9, 0)),
            item("friday", at(10, 16, 23, 59)),
            item("next tuesday", at(10, 20, 12, 0)),
            item("too far", at(10, 26, 0, 0)),
            item("last week", at(10, 11, 23, 0)),
        ];
        let board = DeadlineBoard::build(&items, at(10, 14, 8, 0), 3);
        assert_eq!(board.first_day, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        assert_eq!(board.this_week()[0][0].title, "past monday");
        assert_eq!(board.this_week()[4][0].title, "friday");
        assert_eq!(board.next_week()[1][0].title, "next tuesday");
        let placed: usize = board.days.iter().map(Vec::len).sum();
        assert_eq!(placed, 3);
    }

    #[test]
    fn overflow_is_dropped_keeping_the_earliest() {
        let items = vec![
            item("d", at(10, 13, 22, 0)),
            item("a", at(10, 13, 9, 0)),
            item("c", at(10, 13, 18, 0)),
            item("b", at(10, 13, 12, 0)),
        ];
        let board = DeadlineBoard::build(&items, at(10, 12, 8, 0), 3);
        let titles: Vec<&str> = board.days[1].iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert_eq!(board.dropped, 1);
    }

    #[test]
    fn render_aligns_mixed_width_entries() {
        let items = vec![
            DeadlineItem::new("实验报告", "Lab", at(10, 15, 23, 59)),
            item("Quiz", at(10, 22, 10, 0)),
        ];
        let board = DeadlineBoard::build(&items, at(10, 14, 8, 0), 3);
        let out = board.render(8);
        assert!(out.contains("23:59 实验报告 Lab"));
        assert!(out.contains("Thu 10/15"));
        let widths: Vec<usize> = out.lines().skip(1).map(display_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
    }

    #[test]
    fn empty_board_still_renders_both_weeks() {
        let board = DeadlineBoard::build(&[], at(10, 14, 8, 0), 3);
        assert!(board.is_empty());
        let out = board.render(8);
        assert!(out.contains("This week"));
        assert!(out.contains("Next week"));
    }
}
