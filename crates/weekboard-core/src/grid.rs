//! Weekly grid rendering.
//!
//! Turns a composed [`WeekGrid`] into text: one header row with the day
//! names, then one row per slot. Columns are sized by display width so wide
//! characters never push a row out of alignment.

use crossterm::style::{Color, Stylize};

use crate::compositor::{GridCell, WeekGrid};
use crate::event::{day_name, format_clock, ColorTag};
use crate::width::{max_width, pad_center, pad_to_width};

pub const COLUMN_SEPARATOR: &str = "│";
/// Marker placed before the current row's time label.
pub const NOW_ROW_MARKER: char = '>';
pub const DEFAULT_MIN_COLUMN_WIDTH: usize = 10;

/// Terminal background for a color tag.
pub fn terminal_color(tag: ColorTag) -> Color {
    match tag {
        ColorTag::Red => Color::DarkRed,
        ColorTag::Green => Color::DarkGreen,
        ColorTag::Yellow => Color::DarkYellow,
        ColorTag::Blue => Color::DarkBlue,
        ColorTag::Magenta => Color::DarkMagenta,
        ColorTag::Cyan => Color::DarkCyan,
        ColorTag::Grey => Color::DarkGrey,
    }
}

/// Text renderer for the weekly grid.
#[derive(Debug, Clone)]
pub struct GridRenderer {
    pub min_column_width: usize,
    /// Emit terminal styling (background tags, now highlight).
    pub colorize: bool,
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self {
            min_column_width: DEFAULT_MIN_COLUMN_WIDTH,
            colorize: false,
        }
    }
}

impl GridRenderer {
    pub fn new(min_column_width: usize, colorize: bool) -> Self {
        Self {
            min_column_width,
            colorize,
        }
    }

    /// Column width that fits every label and every day name.
    pub fn column_width(&self, labels: &[String]) -> usize {
        let days = (0..7u8).map(|d| -> &str { day_name(d) });
        max_width(
            labels.iter().map(String::as_str).chain(days),
            self.min_column_width,
        )
    }

    /// Render the grid. `labels` is every label the grid could show.
    pub fn render(&self, grid: &WeekGrid, labels: &[String]) -> String {
        let width = self.column_width(labels);
        let gutter = 1 + 5;
        let mut lines = Vec::with_capacity(grid.rows.len() + 1);

        let mut header = " ".repeat(gutter);
        for day in 0..7u8 {
            header.push_str(COLUMN_SEPARATOR);
            let name = pad_center(day_name(day), width);
            if self.colorize && day == grid.now_day {
                header.push_str(&name.bold().to_string());
            } else {
                header.push_str(&name);
            }
        }
        lines.push(header);

        for (slot, row) in grid.rows.iter().enumerate() {
            let marker = if slot == grid.now_slot { NOW_ROW_MARKER } else { ' ' };
            let mut line = format!("{marker}{}", format_clock(row.start));
            for cell in &row.cells {
                line.push_str(COLUMN_SEPARATOR);
                line.push_str(&self.paint(pad_to_width(&cell.label, width), cell));
            }
            lines.push(line);
        }

        lines.join("\n")
    }

    fn paint(&self, text: String, cell: &GridCell) -> String {
        if !self.colorize {
            return text;
        }
        if cell.is_now {
            return text.reverse().to_string();
        }
        match cell.color {
            Some(tag) => text.on(terminal_color(tag)).to_string(),
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::Compositor;
    use crate::event::{EventId, EventSource, RecurringEvent, SourceTier};
    use crate::width::display_width;
    use chrono::{Duration, NaiveDate, NaiveTime};

    /// Width in columns of one plain grid line.
    fn line_width(width: usize) -> usize {
        1 + 5 + 7 * (display_width(COLUMN_SEPARATOR) + width)
    }

    fn sample_grid(title: &str) -> (WeekGrid, Vec<String>) {
        let sources = vec![EventSource::new(
            SourceTier::Class,
            vec![RecurringEvent::new(
                EventId::new(SourceTier::Class, 0),
                title,
                "Lecture",
                0,
                NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                Duration::minutes(80),
            )],
        )];
        let comp = Compositor::new(&sources, 30);
        let now = NaiveDate::from_ymd_opt(2026, 10, 12)
            .unwrap()
            .and_hms_opt(13, 10, 0)
            .unwrap();
        (comp.compose(now), comp.possible_labels())
    }

    #[test]
    fn every_plain_line_has_the_same_width() {
        let (grid, labels) = sample_grid("数学 2384");
        let renderer = GridRenderer::default();
        let width = renderer.column_width(&labels);
        let out = renderer.render(&grid, &labels);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 49);
        for line in &lines {
            assert_eq!(display_width(line), line_width(width), "{line}");
        }
    }

    #[test]
    fn column_fits_the_widest_label() {
        let (_, labels) = sample_grid("CEG 4166");
        let renderer = GridRenderer::new(4, false);
        // "CEG 4166 Lecture ＋" is 16 + 1 + 2 columns
        assert_eq!(renderer.column_width(&labels), 19);
    }

    #[test]
    fn only_the_current_row_is_marked() {
        let (grid, labels) = sample_grid("CEG 4166");
        let out = GridRenderer::default().render(&grid, &labels);
        let marked: Vec<&str> = out
            .lines()
            .filter(|l| l.starts_with(NOW_ROW_MARKER))
            .collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].starts_with(">13:00"));
        assert!(marked[0].contains("CEG 4166 Lecture"));
    }

    #[test]
    fn header_lists_days_in_order() {
        let (grid, labels) = sample_grid("CEG 4166");
        let out = GridRenderer::default().render(&grid, &labels);
        let header = out.lines().next().unwrap();
        let mon = header.find("Mon").unwrap();
        let sun = header.find("Sun").unwrap();
        assert!(mon < sun);
    }

    #[test]
    fn colorized_output_keeps_labels() {
        let (grid, labels) = sample_grid("CEG 4166");
        let out = GridRenderer::new(10, true).render(&grid, &labels);
        assert!(out.contains("CEG 4166 Lecture"));
    }

    #[test]
    fn now_highlight_replaces_the_background_tag() {
        let (grid, labels) = sample_grid("CEG 4166");
        let renderer = GridRenderer::new(10, true);
        let width = renderer.column_width(&labels);
        let out = renderer.render(&grid, &labels);

        let now_cell = pad_to_width("CEG 4166 Lecture", width);
        let reversed = now_cell.clone().reverse().to_string();
        let tagged = now_cell.on(terminal_color(ColorTag::Blue)).to_string();

        let now_row = out.lines().find(|l| l.starts_with(">13:00")).unwrap();
        assert!(now_row.contains(&reversed), "{now_row:?}");
        if std::env::var_os("NO_COLOR").is_none() {
            assert!(!now_row.contains(&tagged), "{now_row:?}");
        }

        // The continuation one slot later keeps the class background.
        let next_row = out.lines().find(|l| l.starts_with(" 13:30")).unwrap();
        let continuation = pad_to_width(crate::compositor::CONTINUATION_GLYPH, width)
            .on(terminal_color(ColorTag::Blue))
            .to_string();
        assert!(next_row.contains(&continuation), "{next_row:?}");
    }
}
