use std::fmt;
use std::net::IpAddr;

use crate::protocol::Protocol;

/// Width the source address is padded to in discovery messages.
pub const SOURCE_COLUMN_WIDTH: usize = 24;

/// A single response observed on the network.
///
/// Built by a listener the moment a datagram is parsed and handed to the
/// consumer as-is; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    protocol: Protocol,
    source: IpAddr,
    message: String,
}

impl Discovery {
    /// Creates a discovery whose message reads
    /// `"<source, padded to 24> [<tag>] <detail>"`.
    pub fn new(protocol: Protocol, source: IpAddr, detail: &str) -> Self {
        let message: String = format!(
            "{:<width$} [{}] {}",
            source.to_string(),
            protocol.tag(),
            detail,
            width = SOURCE_COLUMN_WIDTH
        );
        Self {
            protocol,
            source,
            message,
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn source(&self) -> IpAddr {
        self.source
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
