use crate::errors::{AppError, AppResult};
use crate::utils::date::format_timestamp;
use crate::utils::time::format_interval;
use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::Serialize;

/// A persisted shift row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShiftRecord {
    pub id: i64,                    // ⇔ shifts.id (INTEGER PK AUTOINCREMENT)
    pub date: NaiveDateTime,        // ⇔ shifts.date (TEXT, local time the shift began)
    pub start: NaiveDateTime,       // ⇔ shifts.start_time
    pub end: Option<NaiveDateTime>, // ⇔ shifts.end_time (NULL never written by us)
    pub duration_millis: i64,       // ⇔ shifts.duration_millis
}

impl ShiftRecord {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// `"HH:MM - HH:MM"`, using the start for both ends when no end is stored.
    pub fn interval_text(&self) -> String {
        format_interval(&self.start, Some(self.end.as_ref().unwrap_or(&self.start)))
    }
}

/// A completed shift that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShift {
    pub date: NaiveDateTime,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_millis: i64,
}

impl NewShift {
    /// Build a shift for `[start, end]`; the grouping date is the start.
    pub fn completed(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<Self> {
        if end < start {
            return Err(AppError::InvalidInterval {
                start: format_timestamp(&start),
                end: format_timestamp(&end),
            });
        }

        Ok(Self {
            date: start,
            start,
            end,
            duration_millis: (end - start).num_milliseconds(),
        })
    }

    pub fn into_record(self, id: i64) -> ShiftRecord {
        ShiftRecord {
            id,
            date: self.date,
            start: self.start,
            end: Some(self.end),
            duration_millis: self.duration_millis,
        }
    }
}
