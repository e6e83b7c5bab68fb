//! Position sampling contract.
//!
//! A sampler pushes readings into a [`WatchHandle`] from its own worker; the
//! owner of the handle pulls them one at a time and applies them in delivery
//! order. Cancelling the handle stops the worker and is safe to repeat.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::geo::{GeoError, GeoReading, GeoSample};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Options handed to the sampler when a watch is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// Cached fixes up to this age may be delivered.
    pub max_age: Duration,
    pub timeout: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            max_age: Duration::from_millis(5_000),
            timeout: Duration::from_millis(20_000),
        }
    }
}

impl WatchOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            high_accuracy: cfg.high_accuracy,
            max_age: Duration::from_millis(cfg.max_sample_age_ms),
            timeout: Duration::from_millis(cfg.sample_timeout_ms),
        }
    }
}

pub trait GeoSampler {
    /// Open a watch. A sampler keeps at most one outstanding watch: opening a
    /// new one cancels the previous.
    fn watch(&mut self, options: &WatchOptions) -> AppResult<WatchHandle>;
}

/// Outcome of waiting on a watch.
#[derive(Debug)]
pub enum Delivery {
    Reading(GeoReading),
    /// Nothing arrived before the deadline.
    Idle,
    /// The sampler finished or was cancelled; nothing more will arrive.
    Closed,
}

/// Producer side of a watch, owned by the sampler worker.
pub struct WatchFeed {
    sender: Sender<GeoReading>,
    cancelled: Arc<AtomicBool>,
}

impl WatchFeed {
    /// Push a reading. Returns false once the watch is cancelled or its
    /// handle is gone, which tells the worker to stop.
    pub fn deliver(&self, reading: GeoReading) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.sender.send(reading).is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Consumer side of a watch. Dropping it cancels the watch.
pub struct WatchHandle {
    receiver: Receiver<GeoReading>,
    cancelled: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Create a connected feed/handle pair.
    pub fn channel() -> (WatchFeed, WatchHandle) {
        let (sender, receiver) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        (
            WatchFeed {
                sender,
                cancelled: Arc::clone(&cancelled),
            },
            WatchHandle {
                receiver,
                cancelled,
                worker: None,
            },
        )
    }

    /// Attach the worker thread so `cancel` can wait for it.
    pub fn with_worker(mut self, worker: JoinHandle<()>) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Shared cancellation flag, for samplers that track their active watch.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Wait up to `timeout` for the next reading.
    pub fn next_within(&self, timeout: Duration) -> Delivery {
        if self.is_cancelled() {
            return Delivery::Closed;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(reading) => Delivery::Reading(reading),
            Err(RecvTimeoutError::Timeout) => Delivery::Idle,
            Err(RecvTimeoutError::Disconnected) => Delivery::Closed,
        }
    }

    /// Stop receiving. Idempotent.
    pub fn cancel(&mut self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            tracing::debug!("geolocation watch cancelled");
        }
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::warn!("geolocation worker panicked");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// One-shot position request: open a watch, wait for the first good fix and
/// cancel. Error readings are skipped; `timeout` bounds each wait.
pub fn current_position<G: GeoSampler>(
    sampler: &mut G,
    options: &WatchOptions,
) -> AppResult<GeoSample> {
    let mut handle = sampler.watch(options)?;
    let mut last_error: Option<GeoError> = None;

    let outcome = loop {
        match handle.next_within(options.timeout) {
            Delivery::Reading(Ok(sample)) => break Ok(sample),
            Delivery::Reading(Err(err)) => {
                tracing::warn!(error = %err, "skipping failed position reading");
                last_error = Some(err);
            }
            Delivery::Idle => break Err(AppError::Sampler(GeoError::Timeout.to_string())),
            Delivery::Closed => {
                let reason = last_error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no position fix available".to_string());
                break Err(AppError::Sampler(reason));
            }
        }
    };

    handle.cancel();
    outcome
}
