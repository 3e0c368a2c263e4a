use std::time::Duration;

use crate::protocol::Protocol;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// What a scanner does when one setup step on an interface fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupFailurePolicy {
    /// Report the failure and carry on with the next step.
    #[default]
    Continue,
    /// Report the failure and give up on the rest of that interface.
    SkipInterface,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Wall-clock deadline for the whole scan.
    pub timeout: Duration,
    /// Protocols to probe, one scanner each, in this order.
    pub protocols: Vec<Protocol>,
    /// Capacity of the results and errors channels.
    ///
    /// Producers wait for room, and give up once the scan is cancelled.
    pub channel_capacity: usize,
    /// Failure handling for the per-interface mDNS setup steps.
    pub mdns_setup: SetupFailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            protocols: vec![Protocol::Ssdp, Protocol::Mdns],
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            mdns_setup: SetupFailurePolicy::default(),
        }
    }
}
