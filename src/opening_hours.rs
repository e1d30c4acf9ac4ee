//! Opening-hours hints.
//!
//! Place data usually carries free-text hours such as `"Mo-Su 09:00-17:30"`
//! or `"24/7"`. Only the first `HH:MM-HH:MM` range is used; day-of-week
//! qualifiers are ignored.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{LAST_MINUTE_OF_DAY, TimeWindow};

static ALWAYS_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)24\s*/\s*7|open\s*24\s*hours").expect("valid always-open pattern")
});

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2}):([0-9]{2})\s*[-\x{2013}]\s*([0-9]{1,2}):([0-9]{2})")
        .expect("valid time range pattern")
});

/// Parse free-text opening hours into a single window.
///
/// Returns `None` when nothing recognizable is found. Ranges that cross
/// midnight are not modelled and collapse to the full day.
pub fn parse_opening_hours(text: &str) -> Option<TimeWindow> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if ALWAYS_OPEN.is_match(text) {
        return Some(TimeWindow::FULL_DAY);
    }

    let caps = TIME_RANGE.captures(text)?;
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let open = (number(1)? * 60 + number(2)?).min(LAST_MINUTE_OF_DAY);
    let close = (number(3)? * 60 + number(4)?).min(LAST_MINUTE_OF_DAY);

    if close < open {
        return Some(TimeWindow::FULL_DAY);
    }
    Some(TimeWindow {
        open_minutes: open,
        close_minutes: close,
    })
}
