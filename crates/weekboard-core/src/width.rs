//! Display-width helpers.
//!
//! Terminal columns are not characters: East-Asian wide and fullwidth
//! characters take two columns. Every label in the grid and the info box is
//! measured and padded with these helpers so mixed text stays aligned.

use unicode_width::UnicodeWidthChar;

/// Rendered column width of `text`. Control characters count as zero.
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if c.is_control() { 0 } else { c.width().unwrap_or(0) })
        .sum()
}

/// Append spaces until `text` is `width` columns wide. Never truncates.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = display_width(text);
    if current >= width {
        return text.to_string();
    }
    format!("{}{}", text, " ".repeat(width - current))
}

/// Center `text` within `width` columns, extra space going to the right.
pub fn pad_center(text: &str, width: usize) -> String {
    let current = display_width(text);
    if current >= width {
        return text.to_string();
    }
    let left = (width - current) / 2;
    let right = width - current - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Widest entry of `labels`, or `floor` if that is wider.
pub fn max_width<'a, I>(labels: I, floor: usize) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .map(display_width)
        .fold(floor, usize::max)
}
