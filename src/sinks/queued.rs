//! Sink that hands records to a worker thread

use crate::core::dispatcher::panic_message;
use crate::core::{dispatch_metrics, EnvLogError, GlobalSink, LogRecord, Result};
use crossbeam_channel::{bounded, Sender};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default time `Drop` waits for the worker to drain
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Moves records over a bounded channel to a worker that feeds `inner`.
///
/// Submitters block while the channel is full, so nothing is dropped and
/// records from one thread reach `inner` in submission order.
pub struct QueuedSink {
    sender: Mutex<Option<Sender<LogRecord<'static>>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    inner: Arc<dyn GlobalSink>,
}

impl QueuedSink {
    pub fn new(inner: Arc<dyn GlobalSink>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(EnvLogError::config("QueuedSink", "capacity must be at least 1"));
        }

        let (sender, receiver) = bounded::<LogRecord<'static>>(capacity);
        let worker_sink = Arc::clone(&inner);

        let worker = thread::Builder::new()
            .name("env-log-queue".to_string())
            .spawn(move || {
                for record in receiver {
                    submit_isolated(worker_sink.as_ref(), &record);
                }
                if let Err(e) = worker_sink.flush() {
                    eprintln!("[ENV LOG ERROR] Sink '{}' flush failed: {}", worker_sink.name(), e);
                }
            })?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            inner,
        })
    }

    /// Stop accepting records and wait for the worker to drain.
    ///
    /// Returns `false` if the worker did not finish within `timeout`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        drop(self.sender.lock().take());

        let Some(handle) = self.worker.lock().take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[ENV LOG ERROR] Queue worker panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[ENV LOG WARNING] Queue worker did not finish within {:?}. \
                     Some records may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

/// One submit on the worker; an error or panic in `sink` costs only this record
fn submit_isolated(sink: &dyn GlobalSink, record: &LogRecord<'_>) {
    match panic::catch_unwind(AssertUnwindSafe(|| sink.submit(record))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            eprintln!("[ENV LOG ERROR] Sink '{}' failed (queued): {}", sink.name(), e);
            dispatch_metrics().record_sink_failure();
        }
        Err(panic_info) => {
            eprintln!(
                "[ENV LOG CRITICAL] Sink '{}' panicked (queued): {}. The record was dropped.",
                sink.name(),
                panic_message(panic_info.as_ref())
            );
            dispatch_metrics().record_sink_failure();
        }
    }
}

impl GlobalSink for QueuedSink {
    fn submit(&self, record: &LogRecord<'_>) -> Result<()> {
        let sender = self
            .sender
            .lock()
            .clone()
            .ok_or_else(|| EnvLogError::sink_stopped(self.name()))?;

        sender
            .send(record.clone().into_owned())
            .map_err(|_| EnvLogError::ChannelSendError)
    }

    /// Flushes the wrapped sink; records still queued are not waited for.
    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        "queued"
    }
}

impl Drop for QueuedSink {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}
