//! Background shift writer.
//!
//! Stopping the timer hands the completed shift to this worker and returns
//! immediately. Failures end up on the notice cell, never in the timer.

use crate::core::recorder::ShiftRecorder;
use crate::core::watch::{Notice, publish};
use crate::errors::{AppError, AppResult};
use crate::models::{NewShift, ShiftRecord};
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub retries: u32,
    /// Wait before retry `n` is `backoff * n`.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 0,
            backoff: Duration::from_millis(200),
        }
    }
}

enum Job {
    Write(NewShift),
    Flush(Sender<()>),
}

pub struct ShiftWriter {
    tx: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl ShiftWriter {
    pub fn spawn(
        recorder: Arc<dyn ShiftRecorder>,
        policy: RetryPolicy,
        notice: Notice,
    ) -> AppResult<Self> {
        let (tx, rx) = mpsc::channel::<Job>();

        let worker = thread::Builder::new()
            .name("shift-writer".into())
            .spawn(move || {
                for job in rx {
                    match job {
                        Job::Write(shift) => {
                            if let Err(e) = write_with_retry(recorder.as_ref(), &shift, policy) {
                                publish(&notice, format!("Could not save shift: {}", e));
                            }
                        }
                        Job::Flush(done) => {
                            let _ = done.send(());
                        }
                    }
                }
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    fn send(&self, job: Job) -> AppResult<()> {
        self.tx
            .as_ref()
            .ok_or(AppError::WriterClosed)?
            .send(job)
            .map_err(|_| AppError::WriterClosed)
    }

    /// Queue a shift for writing. Does not wait for the database.
    pub fn submit(&self, shift: NewShift) -> AppResult<()> {
        self.send(Job::Write(shift))
    }

    /// Block until every shift submitted before this call has been handled.
    pub fn flush(&self) -> AppResult<()> {
        let (done_tx, done_rx) = mpsc::channel();
        self.send(Job::Flush(done_tx))?;
        done_rx.recv().map_err(|_| AppError::WriterClosed)
    }
}

impl Drop for ShiftWriter {
    fn drop(&mut self) {
        // closing the channel lets the worker drain and exit
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Wait before retry `attempt`. Saturates instead of overflowing.
fn backoff_delay(policy: RetryPolicy, attempt: u32) -> Duration {
    policy.backoff.saturating_mul(attempt)
}

/// Insert `shift`, retrying with linear backoff per `policy`.
pub fn write_with_retry(
    recorder: &dyn ShiftRecorder,
    shift: &NewShift,
    policy: RetryPolicy,
) -> AppResult<ShiftRecord> {
    let mut attempt = 0;
    loop {
        match recorder.insert(shift) {
            Ok(rec) => return Ok(rec),
            Err(e) if attempt >= policy.retries => return Err(e),
            Err(_) => {
                attempt += 1;
                thread::sleep(backoff_delay(policy, attempt));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recorder::SqliteRecorder;
    use crate::core::watch::notice_cell;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::Mutex;

    fn dt(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 15)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    /// Fails the first `failures` inserts, then delegates.
    struct Flaky {
        inner: SqliteRecorder,
        failures: Mutex<u32>,
    }

    impl ShiftRecorder for Flaky {
        fn insert(&self, shift: &NewShift) -> AppResult<ShiftRecord> {
            let mut left = self.failures.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(AppError::Other("disk busy".into()));
            }
            self.inner.insert(shift)
        }
        fn most_recent(&self) -> AppResult<Option<ShiftRecord>> {
            self.inner.most_recent()
        }
        fn since(&self, since: &NaiveDateTime) -> AppResult<Vec<ShiftRecord>> {
            self.inner.since(since)
        }
        fn delete_older_than(&self, older_than: &NaiveDateTime) -> AppResult<usize> {
            self.inner.delete_older_than(older_than)
        }
        fn revisions(&self) -> tokio::sync::watch::Receiver<u64> {
            self.inner.revisions()
        }
    }

    fn flaky(failures: u32) -> Arc<Flaky> {
        Arc::new(Flaky {
            inner: SqliteRecorder::in_memory().unwrap(),
            failures: Mutex::new(failures),
        })
    }

    #[test]
    fn flush_waits_for_pending_writes() {
        let rec = Arc::new(SqliteRecorder::in_memory().unwrap());
        let notice = notice_cell();
        let writer = ShiftWriter::spawn(rec.clone(), RetryPolicy::default(), notice.clone()).unwrap();

        writer.submit(NewShift::completed(dt(9), dt(10)).unwrap()).unwrap();
        writer.submit(NewShift::completed(dt(11), dt(12)).unwrap()).unwrap();
        writer.flush().unwrap();

        assert_eq!(rec.since(&dt(0)).unwrap().len(), 2);
        assert_eq!(*notice.borrow(), None);
    }

    #[test]
    fn failure_without_retries_becomes_a_notice() {
        let rec = flaky(1);
        let notice = notice_cell();
        let writer = ShiftWriter::spawn(rec.clone(), RetryPolicy::default(), notice.clone()).unwrap();

        writer.submit(NewShift::completed(dt(9), dt(10)).unwrap()).unwrap();
        writer.flush().unwrap();

        assert!(rec.most_recent().unwrap().is_none());
        assert!(notice.borrow().as_deref().unwrap().contains("disk busy"));
    }

    #[test]
    fn retries_recover_transient_failures() {
        let rec = flaky(2);
        let policy = RetryPolicy {
            retries: 2,
            backoff: Duration::from_millis(1),
        };
        let saved = write_with_retry(rec.as_ref(), &NewShift::completed(dt(9), dt(10)).unwrap(), policy)
            .unwrap();
        assert_eq!(rec.most_recent().unwrap(), Some(saved));
    }

    #[test]
    fn drop_drains_the_queue() {
        let rec = Arc::new(SqliteRecorder::in_memory().unwrap());
        {
            let writer =
                ShiftWriter::spawn(rec.clone(), RetryPolicy::default(), notice_cell()).unwrap();
            writer.submit(NewShift::completed(dt(9), dt(10)).unwrap()).unwrap();
        }
        assert!(rec.most_recent().unwrap().is_some());
    }

    #[test]
    fn huge_backoff_saturates() {
        let policy = RetryPolicy {
            retries: u32::MAX,
            backoff: Duration::MAX,
        };
        assert_eq!(backoff_delay(policy, 2), Duration::MAX);
        assert_eq!(backoff_delay(RetryPolicy::default(), 3), Duration::from_millis(600));
    }
}
