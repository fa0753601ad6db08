#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use rshiftclock::core::{
    Clock, ManualClock, SessionOptions, ShiftRecorder, ShiftSession, SqliteRecorder,
};
use rshiftclock::errors::{AppError, AppResult};
use rshiftclock::models::{NewShift, ShiftRecord};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn rsc() -> Command {
    cargo_bin_cmd!("rshiftclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rshiftclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

/// Wednesday 2025-10-15 at the given time.
pub fn wed(h: u32, mi: u32, s: u32) -> NaiveDateTime {
    at(2025, 10, 15, h, mi, s)
}

pub fn shift(start: NaiveDateTime, end: NaiveDateTime) -> NewShift {
    NewShift::completed(start, end).unwrap()
}

/// SQLite recorder whose writes and reads can be made to fail on demand.
pub struct FaultyRecorder {
    inner: SqliteRecorder,
    pub fail_inserts: AtomicBool,
    pub fail_reads: AtomicBool,
}

impl FaultyRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: SqliteRecorder::in_memory().unwrap(),
            fail_inserts: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        })
    }
}

impl ShiftRecorder for FaultyRecorder {
    fn insert(&self, shift: &NewShift) -> AppResult<ShiftRecord> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Other("disk full".into()));
        }
        self.inner.insert(shift)
    }
    fn most_recent(&self) -> AppResult<Option<ShiftRecord>> {
        self.inner.most_recent()
    }
    fn since(&self, since: &NaiveDateTime) -> AppResult<Vec<ShiftRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Other("database locked".into()));
        }
        self.inner.since(since)
    }
    fn delete_older_than(&self, older_than: &NaiveDateTime) -> AppResult<usize> {
        self.inner.delete_older_than(older_than)
    }
    fn revisions(&self) -> tokio::sync::watch::Receiver<u64> {
        self.inner.revisions()
    }
}

/// Session on `recorder` driven by a manual clock set to `now`.
/// The tick thread is slowed down so tests drive ticks by hand.
pub fn session_at(
    recorder: Arc<dyn ShiftRecorder>,
    now: NaiveDateTime,
) -> (ShiftSession, ManualClock) {
    let clock = ManualClock::new(now);
    let options = SessionOptions {
        tick_interval: std::time::Duration::from_secs(3600),
        ..SessionOptions::default()
    };
    let clock_dyn: Arc<dyn Clock> = Arc::new(clock.clone());
    let session = ShiftSession::open(recorder, clock_dyn, options).unwrap();
    (session, clock)
}

pub fn memory_recorder() -> Arc<SqliteRecorder> {
    Arc::new(SqliteRecorder::in_memory().unwrap())
}
