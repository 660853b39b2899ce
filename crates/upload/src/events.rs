//! Progress event sink.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tracing::trace;
use vidcast_transfer::UploadProgress;

/// Non-blocking sender of [`UploadProgress`] events.
///
/// Events are pushed with `try_send`: when the receiver lags the event is
/// dropped, never the transfer. The last emitted percent is remembered so a
/// failure can be reported where progress stopped.
#[derive(Debug)]
pub struct ProgressSink {
    tx: Option<mpsc::Sender<UploadProgress>>,
    last_percent: AtomicU64,
}

impl ProgressSink {
    pub fn new(tx: mpsc::Sender<UploadProgress>) -> Self {
        Self {
            tx: Some(tx),
            last_percent: AtomicU64::new(0f64.to_bits()),
        }
    }

    /// A sink that discards every event.
    pub fn disabled() -> Self {
        Self {
            tx: None,
            last_percent: AtomicU64::new(0f64.to_bits()),
        }
    }

    pub fn emit(&self, event: UploadProgress) {
        self.last_percent
            .store(event.percent.to_bits(), Ordering::Relaxed);
        let Some(tx) = &self.tx else { return };
        if let Err(e) = tx.try_send(event) {
            trace!(error = %e, "progress event dropped");
        }
    }

    /// Percent carried by the most recent event.
    pub fn last_percent(&self) -> f64 {
        f64::from_bits(self.last_percent.load(Ordering::Relaxed))
    }
}
