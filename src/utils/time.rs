//! Time utilities: clock-face formatting, elapsed-time formatting, ms truncation.

use chrono::{Duration, NaiveDateTime, Timelike};

/// Placeholder shown for an interval that has no bounds yet.
pub const EMPTY_CLOCK: &str = "00:00";

/// `HH:MM` of a timestamp.
pub fn format_clock(t: &NaiveDateTime) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

/// `"HH:MM - HH:MM"`; a missing end renders as `00:00`.
pub fn format_interval(start: &NaiveDateTime, end: Option<&NaiveDateTime>) -> String {
    let end = end.map(format_clock).unwrap_or_else(|| EMPTY_CLOCK.to_string());
    format!("{} - {}", format_clock(start), end)
}

/// Elapsed time as `HH:MM:SS` from one hour upwards, `MM:SS` below.
/// Negative spans render as zero.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    let hours = secs / 3600;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Drop sub-millisecond precision so stored timestamps round-trip exactly.
pub fn truncate_to_millis(t: NaiveDateTime) -> NaiveDateTime {
    let nanos = t.nanosecond();
    t.with_nanosecond(nanos - nanos % 1_000_000).unwrap_or(t)
}
