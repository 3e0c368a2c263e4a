//! The shared fan-in every listener publishes into.
//!
//! Both channels are bounded. A producer waits for room, unless the scan is
//! cancelled first, in which case the event is dropped and the producer is
//! told to stop.

use lanprobe_common::{discovery::Discovery, error::ScanError};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::trace;

#[derive(Clone)]
pub struct EventSink {
    results: Sender<Discovery>,
    errors: Sender<ScanError>,
    cancel: CancellationToken,
}

pub struct EventReceivers {
    pub results: Receiver<Discovery>,
    pub errors: Receiver<ScanError>,
}

impl EventSink {
    pub fn new(capacity: usize, cancel: CancellationToken) -> (Self, EventReceivers) {
        let capacity: usize = capacity.max(1);
        let (results_tx, results_rx) = mpsc::channel(capacity);
        let (errors_tx, errors_rx) = mpsc::channel(capacity);

        let sink = Self {
            results: results_tx,
            errors: errors_tx,
            cancel,
        };
        let receivers = EventReceivers {
            results: results_rx,
            errors: errors_rx,
        };
        (sink, receivers)
    }

    /// Publishes a discovery. Returns `false` once nobody will read it.
    pub async fn discovery(&self, discovery: Discovery) -> bool {
        send_or_drop(&self.results, discovery, &self.cancel).await
    }

    /// Publishes an error. Returns `false` once nobody will read it.
    pub async fn error(&self, error: ScanError) -> bool {
        send_or_drop(&self.errors, error, &self.cancel).await
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

async fn send_or_drop<T: std::fmt::Debug>(
    tx: &Sender<T>,
    item: T,
    cancel: &CancellationToken,
) -> bool {
    if cancel.is_cancelled() {
        trace!(?item, "scan cancelled, dropping event");
        return false;
    }

    tokio::select! {
        _ = cancel.cancelled() => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}
