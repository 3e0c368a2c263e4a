//! The central **abstraction** for discovery scanners.
//!
//! A [`Scanner`] probes one protocol over a set of interfaces. Its setup runs
//! in its own task; every socket it opens is handed to a listener task
//! through the [`ScanContext`], which also carries the shared sink, the
//! cancellation token and the task group the controller waits on.

use std::sync::Arc;

use async_trait::async_trait;
use lanprobe_common::{config::Config, error::ScanError, protocol::Protocol};
use pnet::datalink::NetworkInterface;
use tokio::net::UdpSocket;
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::network::listener::{self, Decoder};
use crate::sink::EventSink;

pub mod mdns;
pub mod ssdp;

pub use mdns::MdnsScanner;
pub use ssdp::SsdpScanner;

#[async_trait]
pub trait Scanner: Send + Sync {
    fn protocol(&self) -> Protocol;

    /// Opens sockets, sends queries and spawns listeners for `interfaces`.
    ///
    /// Failures are reported through `ctx`; they never abort other scanners.
    async fn scan(&self, interfaces: &[NetworkInterface], ctx: &ScanContext);
}

/// Builds the scanner for `protocol`.
pub fn for_protocol(protocol: Protocol, cfg: &Config) -> Arc<dyn Scanner> {
    match protocol {
        Protocol::Ssdp => Arc::new(SsdpScanner),
        Protocol::Mdns => Arc::new(MdnsScanner::new(cfg.mdns_setup)),
    }
}

/// Everything a running scanner shares with the controller.
#[derive(Clone)]
pub struct ScanContext {
    sink: EventSink,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl ScanContext {
    pub(crate) fn new(sink: EventSink, cancel: CancellationToken, tracker: TaskTracker) -> Self {
        Self {
            sink,
            cancel,
            tracker,
        }
    }

    pub fn sink(&self) -> &EventSink {
        &self.sink
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Reports a non-fatal error on the shared error channel.
    pub async fn report(&self, error: ScanError) {
        self.sink.error(error).await;
    }

    /// Moves `socket` into a new listener task.
    pub fn spawn_listener(&self, socket: UdpSocket, decoder: Decoder) {
        self.tracker.spawn(listener::listen(
            socket,
            decoder,
            self.sink.clone(),
            self.cancel.clone(),
        ));
    }
}
