//! Weekly history: one `"HH:MM - HH:MM"` line per weekday for the current week.

use crate::core::clock::Clock;
use crate::core::recorder::ShiftRecorder;
use crate::core::watch::{Notice, Waiter, publish};
use crate::errors::AppResult;
use crate::models::{ShiftRecord, WeeklySummary};
use crate::utils::date::start_of_week;
use chrono::Weekday;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::watch;

/// How often the watcher thread checks for shutdown while idle.
const WATCH_POLL: Duration = Duration::from_millis(100);

/// Reduce records to one entry per weekday.
///
/// When a weekday has several shifts, the one inserted last (highest id)
/// wins, whatever their start times.
pub fn summarize(records: &[ShiftRecord]) -> WeeklySummary {
    let mut latest: HashMap<Weekday, &ShiftRecord> = HashMap::new();
    for rec in records {
        latest
            .entry(rec.weekday())
            .and_modify(|cur| {
                if rec.id > cur.id {
                    *cur = rec;
                }
            })
            .or_insert(rec);
    }

    let mut summary = WeeklySummary::new();
    for (day, rec) in latest {
        summary.insert(day, rec.interval_text());
    }
    summary
}

pub struct WeeklyHistory {
    recorder: Arc<dyn ShiftRecorder>,
    clock: Arc<dyn Clock>,
    summary: watch::Sender<WeeklySummary>,
    notice: Notice,
    refreshing: Mutex<()>,
}

impl WeeklyHistory {
    pub fn new(
        recorder: Arc<dyn ShiftRecorder>,
        clock: Arc<dyn Clock>,
        notice: Notice,
    ) -> Self {
        Self {
            recorder,
            clock,
            summary: watch::Sender::new(WeeklySummary::new()),
            notice,
            refreshing: Mutex::new(()),
        }
    }

    /// Re-read the current week and publish the result.
    ///
    /// On a read error the last published summary stays in place.
    pub fn refresh(&self) -> AppResult<WeeklySummary> {
        let _one_at_a_time = self.refreshing.lock().unwrap_or_else(PoisonError::into_inner);
        let since = start_of_week(&self.clock.now());

        match self.recorder.since(&since) {
            Ok(records) => {
                let summary = summarize(&records);
                self.summary.send_if_modified(|current| {
                    if *current == summary {
                        return false;
                    }
                    *current = summary.clone();
                    true
                });
                Ok(summary)
            }
            Err(e) => {
                publish(&self.notice, format!("Could not load weekly history: {}", e));
                Err(e)
            }
        }
    }

    pub fn summary(&self) -> WeeklySummary {
        self.summary.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeeklySummary> {
        self.summary.subscribe()
    }

    /// Recompute on every recorder change until the returned handle is dropped.
    ///
    /// Changes that arrive during a recomputation are folded into a single
    /// follow-up run.
    pub fn watch(self: &Arc<Self>) -> AppResult<HistoryWatcher> {
        let stop = Arc::new(AtomicBool::new(false));
        let mut revisions = self.recorder.revisions();
        let waiter = Waiter::new()?;
        let history = Arc::clone(self);
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("history-watch".into())
            .spawn(move || {
                while !flag.load(Ordering::Acquire) {
                    match waiter.changed_within(&mut revisions, WATCH_POLL) {
                        // error already surfaced as a notice
                        Ok(Some(_)) => {
                            let _ = history.refresh();
                        }
                        Ok(None) => {}
                        Err(_) => break,
                    }
                }
            })?;

        Ok(HistoryWatcher {
            stop,
            handle: Some(handle),
        })
    }
}

pub struct HistoryWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Drop for HistoryWatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewShift;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn rec(id: i64, start: NaiveDateTime, end: NaiveDateTime) -> ShiftRecord {
        NewShift::completed(start, end).unwrap().into_record(id)
    }

    #[test]
    fn one_entry_per_weekday() {
        let records = vec![
            rec(3, dt(15, 9, 0), dt(15, 17, 30)),
            rec(1, dt(13, 8, 0), dt(13, 16, 0)),
        ];
        let s = summarize(&records);
        assert_eq!(s.len(), 2);
        assert_eq!(s.get(Weekday::Wed), Some("09:00 - 17:30"));
        assert_eq!(s.get(Weekday::Mon), Some("08:00 - 16:00"));
        assert_eq!(s.get(Weekday::Tue), None);
    }

    #[test]
    fn later_insert_wins_even_with_earlier_start() {
        // id 2 was written after id 1 but started earlier in the day
        let records = vec![
            rec(1, dt(15, 14, 0), dt(15, 18, 0)),
            rec(2, dt(15, 7, 0), dt(15, 9, 0)),
        ];
        assert_eq!(summarize(&records).get(Weekday::Wed), Some("07:00 - 09:00"));

        let reversed: Vec<ShiftRecord> = records.into_iter().rev().collect();
        assert_eq!(summarize(&reversed).get(Weekday::Wed), Some("07:00 - 09:00"));
    }

    #[test]
    fn missing_end_uses_start_twice() {
        let mut r = rec(1, dt(14, 10, 15), dt(14, 12, 0));
        r.end = None;
        assert_eq!(summarize(&[r]).get(Weekday::Tue), Some("10:15 - 10:15"));
    }

    #[test]
    fn empty_input_gives_empty_summary() {
        assert!(summarize(&[]).is_empty());
    }
}
