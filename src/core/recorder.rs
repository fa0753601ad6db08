//! Persistence contract for completed shifts, and its SQLite implementation.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{delete_shifts_older_than, insert_shift, last_shift, shifts_since};
use crate::errors::AppResult;
use crate::models::{NewShift, ShiftRecord};
use crate::ui::messages::warning;
use crate::utils::date::format_timestamp;
use chrono::NaiveDateTime;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

pub trait ShiftRecorder: Send + Sync {
    /// Append a shift. Durable once this returns `Ok`.
    fn insert(&self, shift: &NewShift) -> AppResult<ShiftRecord>;

    /// Latest shift by insertion order.
    fn most_recent(&self) -> AppResult<Option<ShiftRecord>>;

    /// Shifts with `date >= since`, ordered by date descending.
    fn since(&self, since: &NaiveDateTime) -> AppResult<Vec<ShiftRecord>>;

    /// Remove shifts with `date < older_than`. Returns how many went.
    fn delete_older_than(&self, older_than: &NaiveDateTime) -> AppResult<usize>;

    /// Change counter, bumped after every insert or effective delete.
    fn revisions(&self) -> watch::Receiver<u64>;
}

pub struct SqliteRecorder {
    pool: Mutex<DbPool>,
    revision: watch::Sender<u64>,
}

impl SqliteRecorder {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool: Mutex::new(pool),
            revision: watch::Sender::new(0),
        }
    }

    /// Open (and migrate) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        Ok(Self::new(DbPool::open_initialized(path)?))
    }

    pub fn in_memory() -> AppResult<Self> {
        Ok(Self::new(DbPool::in_memory()?))
    }

    fn pool(&self) -> MutexGuard<'_, DbPool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

fn log_quietly(pool: &DbPool, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(&pool.conn, operation, target, message) {
        warning(format!("Failed to write internal log: {}", e));
    }
}

impl ShiftRecorder for SqliteRecorder {
    fn insert(&self, shift: &NewShift) -> AppResult<ShiftRecord> {
        let record = {
            let pool = self.pool();
            let id = insert_shift(&pool.conn, shift)?;
            let record = shift.clone().into_record(id);
            log_quietly(
                &pool,
                "insert",
                &format!("shift #{}", id),
                &format!(
                    "{} ({} ms)",
                    record.interval_text(),
                    record.duration_millis
                ),
            );
            record
        };
        self.bump();
        Ok(record)
    }

    fn most_recent(&self) -> AppResult<Option<ShiftRecord>> {
        last_shift(&self.pool().conn)
    }

    fn since(&self, since: &NaiveDateTime) -> AppResult<Vec<ShiftRecord>> {
        shifts_since(&self.pool().conn, since)
    }

    fn delete_older_than(&self, older_than: &NaiveDateTime) -> AppResult<usize> {
        let removed = {
            let pool = self.pool();
            let removed = delete_shifts_older_than(&pool.conn, older_than)?;
            if removed > 0 {
                log_quietly(
                    &pool,
                    "prune",
                    &format_timestamp(older_than),
                    &format!("Deleted {} shift(s)", removed),
                );
            }
            removed
        };
        if removed > 0 {
            self.bump();
        }
        Ok(removed)
    }

    fn revisions(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn insert_and_delete_bump_revision() {
        let rec = SqliteRecorder::in_memory().unwrap();
        let revs = rec.revisions();
        assert_eq!(*revs.borrow(), 0);

        rec.insert(&NewShift::completed(dt(6, 9), dt(6, 17)).unwrap())
            .unwrap();
        assert_eq!(*revs.borrow(), 1);

        // nothing to delete → no change
        assert_eq!(rec.delete_older_than(&dt(1, 0)).unwrap(), 0);
        assert_eq!(*revs.borrow(), 1);

        assert_eq!(rec.delete_older_than(&dt(13, 0)).unwrap(), 1);
        assert_eq!(*revs.borrow(), 2);
    }

    #[test]
    fn most_recent_follows_insertion_order() {
        let rec = SqliteRecorder::in_memory().unwrap();
        assert!(rec.most_recent().unwrap().is_none());

        rec.insert(&NewShift::completed(dt(15, 9), dt(15, 10)).unwrap())
            .unwrap();
        let second = rec
            .insert(&NewShift::completed(dt(14, 9), dt(14, 10)).unwrap())
            .unwrap();
        assert_eq!(rec.most_recent().unwrap(), Some(second));
    }

    #[test]
    fn operations_are_logged() {
        let rec = SqliteRecorder::in_memory().unwrap();
        rec.insert(&NewShift::completed(dt(6, 9), dt(6, 17)).unwrap())
            .unwrap();
        rec.delete_older_than(&dt(13, 0)).unwrap();

        let ops: Vec<String> = {
            let pool = rec.pool();
            let mut stmt = pool
                .conn
                .prepare("SELECT operation FROM log WHERE operation != 'migration_applied' ORDER BY id")
                .unwrap();
            let ops = stmt
                .query_map([], |r| r.get(0))
                .unwrap()
                .map(|r| r.unwrap())
                .collect();
            ops
        };
        assert_eq!(ops, vec!["insert", "prune"]);
    }
}
