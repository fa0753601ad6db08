//! One application session: timer, writer and weekly history wired to a recorder.

use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::history::{HistoryWatcher, WeeklyHistory};
use crate::core::recorder::{ShiftRecorder, SqliteRecorder};
use crate::core::timer::{ShiftTimer, TimerDisplay};
use crate::core::watch::{Notice, notice_cell, publish};
use crate::core::writer::{RetryPolicy, ShiftWriter};
use crate::errors::AppResult;
use crate::models::{Phase, ShiftRecord, WeeklySummary};
use crate::utils::date::start_of_week;
use chrono::{Duration as ChronoDuration, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub tick_interval: Duration,
    pub retry: RetryPolicy,
    pub retention_weeks: Option<u32>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            retry: RetryPolicy::default(),
            retention_weeks: None,
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            tick_interval: cfg.tick_interval(),
            retry: RetryPolicy {
                retries: cfg.write_retries,
                backoff: cfg.write_backoff(),
            },
            retention_weeks: cfg.retention_weeks,
        }
    }
}

/// Start of the oldest week kept when `weeks` full weeks are retained.
///
/// A span reaching past the calendar's range keeps everything.
pub fn retention_cutoff(now: &NaiveDateTime, weeks: u32) -> NaiveDateTime {
    ChronoDuration::try_weeks(i64::from(weeks))
        .and_then(|span| start_of_week(now).checked_sub_signed(span))
        .unwrap_or(NaiveDateTime::MIN)
}

pub struct ShiftSession {
    recorder: Arc<dyn ShiftRecorder>,
    writer: Arc<ShiftWriter>,
    timer: ShiftTimer,
    history: Arc<WeeklyHistory>,
    watcher: Option<HistoryWatcher>,
    notice: Notice,
    closed: bool,
}

impl ShiftSession {
    pub fn open(
        recorder: Arc<dyn ShiftRecorder>,
        clock: Arc<dyn Clock>,
        options: SessionOptions,
    ) -> AppResult<Self> {
        let notice = notice_cell();

        if let Some(weeks) = options.retention_weeks {
            let cutoff = retention_cutoff(&clock.now(), weeks);
            if let Err(e) = recorder.delete_older_than(&cutoff) {
                publish(&notice, format!("Could not prune old shifts: {}", e));
            }
        }

        let writer = Arc::new(ShiftWriter::spawn(
            Arc::clone(&recorder),
            options.retry,
            notice.clone(),
        )?);
        let timer = ShiftTimer::new(
            Arc::clone(&clock),
            Arc::clone(&writer),
            options.tick_interval,
            notice.clone(),
        );
        let history = Arc::new(WeeklyHistory::new(
            Arc::clone(&recorder),
            clock,
            notice.clone(),
        ));

        let watcher = history.watch()?;
        // a failed first read leaves an empty summary and a notice
        let _ = history.refresh();

        Ok(Self {
            recorder,
            writer,
            timer,
            history,
            watcher: Some(watcher),
            notice,
            closed: false,
        })
    }

    /// Session on the configured SQLite database and the system clock.
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let recorder = SqliteRecorder::open(cfg.database_path())?;
        Self::open(Arc::new(recorder), Arc::new(SystemClock), cfg.into())
    }

    // ---------------------------
    // Inbound
    // ---------------------------

    pub fn toggle(&self) {
        self.timer.toggle();
    }

    pub fn reset(&self) {
        self.timer.reset();
    }

    pub fn stop_if_active(&self) {
        self.timer.stop_if_active();
    }

    /// Refresh the elapsed-time text now instead of waiting for the next tick.
    pub fn tick(&self) -> bool {
        self.timer.refresh_elapsed()
    }

    /// Wait for queued writes, then bring the weekly summary up to date.
    pub fn flush(&self) -> AppResult<()> {
        self.writer.flush()?;
        self.history.refresh()?;
        Ok(())
    }

    /// Stop a running shift, persist it and stop background work.
    pub fn close(&mut self) -> AppResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.timer.stop_if_active();
        let flushed = self.writer.flush();
        self.watcher.take();
        flushed
    }

    // ---------------------------
    // Outbound
    // ---------------------------

    pub fn elapsed_time_text(&self) -> String {
        self.timer.display().elapsed_text
    }

    pub fn interval_range_text(&self) -> String {
        self.timer.display().interval_text
    }

    pub fn is_running(&self) -> bool {
        self.timer.phase().is_running()
    }

    pub fn phase(&self) -> Phase {
        self.timer.phase()
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.timer.start_time()
    }

    pub fn display(&self) -> TimerDisplay {
        self.timer.display()
    }

    pub fn weekly_summary(&self) -> WeeklySummary {
        self.history.summary()
    }

    /// Latest non-fatal problem (failed save, failed history read, …).
    pub fn notice(&self) -> Option<String> {
        self.notice.borrow().clone()
    }

    pub fn last_shift(&self) -> AppResult<Option<ShiftRecord>> {
        self.recorder.most_recent()
    }

    pub fn subscribe_display(&self) -> watch::Receiver<TimerDisplay> {
        self.timer.subscribe()
    }

    pub fn subscribe_summary(&self) -> watch::Receiver<WeeklySummary> {
        self.history.subscribe()
    }

    pub fn subscribe_notice(&self) -> watch::Receiver<Option<String>> {
        self.notice.subscribe()
    }
}

impl Drop for ShiftSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn retention_cutoff_counts_whole_weeks_back_from_monday() {
        // Wednesday 2025-10-15 → this week starts Monday 2025-10-13
        let now = NaiveDate::from_ymd_opt(2025, 10, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 9, 29)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(retention_cutoff(&now, 2), expected);
        assert_eq!(retention_cutoff(&now, 0), start_of_week(&now));
    }

    #[test]
    fn retention_beyond_calendar_range_keeps_everything() {
        let now = NaiveDate::from_ymd_opt(2025, 10, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(retention_cutoff(&now, 20_000_000), NaiveDateTime::MIN);
        assert_eq!(retention_cutoff(&now, u32::MAX), NaiveDateTime::MIN);
    }

    #[test]
    fn options_follow_config() {
        let cfg = Config {
            tick_interval_ms: 250,
            write_retries: 3,
            write_backoff_ms: 10,
            retention_weeks: Some(4),
            ..Config::default()
        };
        let opts = SessionOptions::from(&cfg);
        assert_eq!(opts.tick_interval, Duration::from_millis(250));
        assert_eq!(opts.retry.retries, 3);
        assert_eq!(opts.retry.backoff, Duration::from_millis(10));
        assert_eq!(opts.retention_weeks, Some(4));
    }
}
