//! Shift timer state machine.
//!
//! ```text
//! Idle ──start──▶ Running ──stop──▶ StoppedUncommitted
//!  ▲                 │                      │
//!  └─────reset───────┴────────reset─────────┘
//! ```
//!
//! `toggle` stops a running timer, otherwise resets (if stopped) and starts.
//! Illegal transitions are ignored. While running, a tick thread refreshes
//! the elapsed-time text on a fixed cadence.

use crate::core::clock::Clock;
use crate::core::watch::{Notice, publish};
use crate::core::writer::ShiftWriter;
use crate::models::{NewShift, Phase};
use crate::utils::time::{EMPTY_CLOCK, format_elapsed, format_interval};
use chrono::NaiveDateTime;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::watch;

/// What the display layer renders for the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerDisplay {
    pub phase: Phase,
    pub elapsed_text: String,
    pub interval_text: String,
}

impl TimerDisplay {
    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }
}

impl Default for TimerDisplay {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            elapsed_text: EMPTY_CLOCK.to_string(),
            interval_text: format!("{} - {}", EMPTY_CLOCK, EMPTY_CLOCK),
        }
    }
}

#[derive(Debug, Default)]
struct TimerState {
    phase: Phase,
    start: Option<NaiveDateTime>,
    /// Bumped on every transition; a tick from an older run must not publish.
    generation: u64,
}

struct Inner {
    clock: Arc<dyn Clock>,
    state: Mutex<TimerState>,
    display: watch::Sender<TimerDisplay>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recompute the elapsed text. `None` accepts any running generation.
    fn refresh(&self, generation: Option<u64>) -> bool {
        let st = self.state();
        if !st.phase.is_running() || generation.is_some_and(|g| g != st.generation) {
            return false;
        }
        let Some(start) = st.start else {
            return false;
        };
        let text = format_elapsed(self.clock.now() - start);
        // published under the state lock so a transition never interleaves
        self.display.send_modify(|d| d.elapsed_text = text);
        true
    }
}

struct Ticker {
    cancel: Arc<(Mutex<bool>, Condvar)>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(inner: Arc<Inner>, generation: u64, interval: Duration) -> std::io::Result<Self> {
        let cancel = Arc::new((Mutex::new(false), Condvar::new()));
        let flag = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name("shift-tick".into())
            .spawn(move || {
                let (lock, cvar) = &*flag;
                loop {
                    let cancelled = lock.lock().unwrap_or_else(PoisonError::into_inner);
                    let (cancelled, _) = cvar
                        .wait_timeout_while(cancelled, interval, |c| !*c)
                        .unwrap_or_else(PoisonError::into_inner);
                    if *cancelled {
                        break;
                    }
                    drop(cancelled);
                    if !inner.refresh(Some(generation)) {
                        break;
                    }
                }
            })?;

        Ok(Self { cancel, handle })
    }

    fn stop(self) {
        let (lock, cvar) = &*self.cancel;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
        let _ = self.handle.join();
    }
}

pub struct ShiftTimer {
    inner: Arc<Inner>,
    writer: Arc<ShiftWriter>,
    notice: Notice,
    tick_interval: Duration,
    /// Serializes user transitions and owns the tick thread of the current run.
    ticker: Mutex<Option<Ticker>>,
}

impl ShiftTimer {
    pub fn new(
        clock: Arc<dyn Clock>,
        writer: Arc<ShiftWriter>,
        tick_interval: Duration,
        notice: Notice,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                clock,
                state: Mutex::new(TimerState::default()),
                display: watch::Sender::new(TimerDisplay::default()),
            }),
            writer,
            notice,
            tick_interval,
            ticker: Mutex::new(None),
        }
    }

    fn transition(&self) -> MutexGuard<'_, Option<Ticker>> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn toggle(&self) {
        let mut ticker = self.transition();
        match self.phase() {
            Phase::Running => self.stop_locked(&mut ticker),
            Phase::StoppedUncommitted => {
                self.reset_locked(&mut ticker);
                self.start_locked(&mut ticker);
            }
            Phase::Idle => self.start_locked(&mut ticker),
        }
    }

    /// Start a new run. Ignored while running; a stopped interval is cleared first.
    pub fn start(&self) {
        let mut ticker = self.transition();
        match self.phase() {
            Phase::Running => {}
            Phase::StoppedUncommitted => {
                self.reset_locked(&mut ticker);
                self.start_locked(&mut ticker);
            }
            Phase::Idle => self.start_locked(&mut ticker),
        }
    }

    /// Stop the current run and hand the shift to the writer. Ignored unless running.
    pub fn stop(&self) {
        let mut ticker = self.transition();
        self.stop_locked(&mut ticker);
    }

    pub fn stop_if_active(&self) {
        let mut ticker = self.transition();
        if self.phase().is_running() {
            self.stop_locked(&mut ticker);
        }
    }

    /// Back to idle from any phase. Saved shifts are left alone.
    pub fn reset(&self) {
        let mut ticker = self.transition();
        self.reset_locked(&mut ticker);
    }

    /// One tick, on demand.
    pub fn refresh_elapsed(&self) -> bool {
        self.inner.refresh(None)
    }

    pub fn phase(&self) -> Phase {
        self.inner.state().phase
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.inner.state().start
    }

    pub fn display(&self) -> TimerDisplay {
        self.inner.display.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerDisplay> {
        self.inner.display.subscribe()
    }

    fn start_locked(&self, ticker: &mut Option<Ticker>) {
        let generation = {
            let mut st = self.inner.state();
            if st.phase != Phase::Idle {
                return;
            }
            let now = self.inner.clock.now();
            st.phase = Phase::Running;
            st.start = Some(now);
            st.generation += 1;
            self.inner.display.send_replace(TimerDisplay {
                phase: Phase::Running,
                elapsed_text: EMPTY_CLOCK.to_string(),
                interval_text: format_interval(&now, None),
            });
            st.generation
        };

        match Ticker::spawn(Arc::clone(&self.inner), generation, self.tick_interval) {
            Ok(t) => *ticker = Some(t),
            Err(e) => publish(&self.notice, format!("Elapsed time will not refresh: {}", e)),
        }
    }

    fn stop_locked(&self, ticker: &mut Option<Ticker>) {
        let shift = {
            let mut st = self.inner.state();
            if st.phase != Phase::Running {
                return;
            }
            let Some(start) = st.start else {
                return;
            };
            // a clock that went backwards must not produce a negative shift
            let end = self.inner.clock.now().max(start);
            st.phase = Phase::StoppedUncommitted;
            st.generation += 1;
            self.inner.display.send_replace(TimerDisplay {
                phase: Phase::StoppedUncommitted,
                elapsed_text: format_elapsed(end - start),
                interval_text: format_interval(&start, Some(&end)),
            });
            NewShift::completed(start, end)
        };

        if let Some(t) = ticker.take() {
            t.stop();
        }

        let submitted = shift.and_then(|s| self.writer.submit(s));
        if let Err(e) = submitted {
            publish(&self.notice, format!("Could not save shift: {}", e));
        }
    }

    fn reset_locked(&self, ticker: &mut Option<Ticker>) {
        {
            let mut st = self.inner.state();
            st.phase = Phase::Idle;
            st.start = None;
            st.generation += 1;
            self.inner.display.send_replace(TimerDisplay::default());
        }

        if let Some(t) = ticker.take() {
            t.stop();
        }
    }
}

impl Drop for ShiftTimer {
    fn drop(&mut self) {
        if let Some(t) = self.transition().take() {
            t.stop();
        }
    }
}
