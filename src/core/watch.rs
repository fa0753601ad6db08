//! Observable state is published through `tokio::sync::watch` channels.
//!
//! Receivers only ever see the latest value, so several publications that
//! land while a reader is busy collapse into a single wake-up. The helpers
//! here let plain threads block on a receiver with a timeout.

use crate::errors::AppResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::watch::{self, Receiver, Sender, error::RecvError};

/// Shared cell for non-fatal problems shown to the user.
pub type Notice = Arc<Sender<Option<String>>>;

pub fn notice_cell() -> Notice {
    Arc::new(watch::Sender::new(None))
}

pub fn publish(notice: &Sender<Option<String>>, message: String) {
    notice.send_replace(Some(message));
}

/// Blocks the current thread on watch receivers.
pub struct Waiter {
    rt: Runtime,
}

impl Waiter {
    pub fn new() -> AppResult<Self> {
        let rt = Builder::new_current_thread().enable_time().build()?;
        Ok(Self { rt })
    }

    /// Wait up to `timeout` for a value newer than the last one seen.
    ///
    /// `Ok(None)` on timeout; `Err` once every sender is gone.
    pub fn changed_within<T: Clone>(
        &self,
        rx: &mut Receiver<T>,
        timeout: Duration,
    ) -> Result<Option<T>, RecvError> {
        match self
            .rt
            .block_on(async { tokio::time::timeout(timeout, rx.changed()).await })
        {
            Ok(Ok(())) => Ok(Some(rx.borrow_and_update().clone())),
            Ok(Err(closed)) => Err(closed),
            Err(_elapsed) => Ok(None),
        }
    }
}
