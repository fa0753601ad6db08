use crate::utils::date::{WEEK, weekday_name};
use chrono::Weekday;
use serde::Serialize;
use std::collections::BTreeMap;

/// Weekday name → `"HH:MM - HH:MM"` for the current week.
///
/// Keys are upper-case English names (`"WEDNESDAY"`). Days without a shift
/// are absent; the display layer decides what to show for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeeklySummary {
    entries: BTreeMap<String, String>,
}

impl WeeklySummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: Weekday, interval: String) {
        self.entries.insert(weekday_name(day).to_string(), interval);
    }

    pub fn get(&self, day: Weekday) -> Option<&str> {
        self.entries.get(weekday_name(day)).map(String::as_str)
    }

    /// Lookup by upper-case weekday name.
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in Monday → Sunday order.
    pub fn iter_week(&self) -> impl Iterator<Item = (Weekday, &str)> + '_ {
        WEEK.iter().filter_map(|d| self.get(*d).map(|s| (*d, s)))
    }
}
