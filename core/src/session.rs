//! # Scan Session
//!
//! Aggregation and timeout control for one scan.
//!
//! A session starts one task per scanner, then hands out the events they
//! publish until a single wall-clock deadline fires. The deadline is the
//! only way a session ends on its own; when it fires every socket is closed
//! through the shared cancellation token.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use lanprobe_common::{
    config::Config,
    discovery::Discovery,
    error::{ScanError, ScanEvent},
};
use pnet::datalink::NetworkInterface;
use tokio::sync::mpsc::Receiver;
use tokio::time::{Instant, Sleep};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, info};

use crate::scanner::{self, ScanContext, Scanner};
use crate::sink::{EventReceivers, EventSink};

pub struct ScanSession {
    results: Receiver<Discovery>,
    errors: Receiver<ScanError>,
    results_open: bool,
    errors_open: bool,
    deadline: Pin<Box<Sleep>>,
    finished: bool,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl ScanSession {
    /// Starts one scanner per protocol in `cfg` over `interfaces`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(interfaces: Vec<NetworkInterface>, cfg: &Config) -> Self {
        let scanners: Vec<Arc<dyn Scanner>> = cfg
            .protocols
            .iter()
            .map(|protocol| scanner::for_protocol(*protocol, cfg))
            .collect();
        Self::start_with(interfaces, scanners, cfg)
    }

    /// Starts the given scanners; the protocol list in `cfg` is ignored.
    pub fn start_with(
        interfaces: Vec<NetworkInterface>,
        scanners: Vec<Arc<dyn Scanner>>,
        cfg: &Config,
    ) -> Self {
        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();
        let (sink, receivers) = EventSink::new(cfg.channel_capacity, cancel.clone());
        let EventReceivers { results, errors } = receivers;
        let ctx = ScanContext::new(sink, cancel.clone(), tracker.clone());
        let interfaces: Arc<[NetworkInterface]> = interfaces.into();

        info!(
            interfaces = interfaces.len(),
            scanners = scanners.len(),
            timeout = ?cfg.timeout,
            "starting scan"
        );

        for scanner in scanners {
            let ctx = ctx.clone();
            let interfaces = Arc::clone(&interfaces);
            tracker.spawn(async move {
                debug!(protocol = %scanner.protocol(), "scanner started");
                scanner.scan(&interfaces, &ctx).await;
                debug!(protocol = %scanner.protocol(), "scanner setup finished");
            });
        }

        Self {
            results,
            errors,
            results_open: true,
            errors_open: true,
            deadline: Box::pin(tokio::time::sleep(cfg.timeout)),
            finished: false,
            cancel,
            tracker,
        }
    }

    /// Waits for the next discovery or error.
    ///
    /// Returns `None` once the deadline has fired or the session was
    /// cancelled, and on every call after that.
    pub async fn next_event(&mut self) -> Option<ScanEvent> {
        loop {
            if self.finished {
                return None;
            }

            tokio::select! {
                biased;

                _ = self.deadline.as_mut() => {
                    debug!("scan deadline reached");
                    self.finish();
                }
                _ = self.cancel.cancelled() => {
                    self.finished = true;
                }
                error = self.errors.recv(), if self.errors_open => match error {
                    Some(error) => return Some(ScanEvent::Error(error)),
                    None => self.errors_open = false,
                },
                discovery = self.results.recv(), if self.results_open => match discovery {
                    Some(discovery) => return Some(ScanEvent::Discovery(discovery)),
                    None => self.results_open = false,
                },
            }
        }
    }

    /// Ends the session early, closing every socket.
    pub fn cancel(&mut self) {
        self.finish();
    }

    /// Instant at which the session stops handing out events.
    pub fn deadline(&self) -> Instant {
        self.deadline.deadline()
    }

    /// Time left before the deadline.
    pub fn remaining(&self) -> Duration {
        self.deadline().saturating_duration_since(Instant::now())
    }

    /// Cancels the scan and waits for every scanner and listener task to end.
    pub async fn shutdown(mut self) {
        self.finish();
        let tracker: TaskTracker = self.tracker.clone();
        drop(self);

        tracker.close();
        tracker.wait().await;
        debug!("all scan tasks stopped");
    }

    /// Scanner and listener tasks still running.
    #[cfg(test)]
    pub(crate) fn active_tasks(&self) -> usize {
        self.tracker.len()
    }

    fn finish(&mut self) {
        self.finished = true;
        self.cancel.cancel();
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
