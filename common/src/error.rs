//! Non-fatal scan errors.
//!
//! Everything that goes wrong once a scan is running ends up here and is
//! published on the shared error channel; none of it stops other sockets.

use std::io;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::discovery::Discovery;
use crate::protocol::Protocol;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("failed to join multicast group {group} on {interface}: {source}")]
    Join {
        group: IpAddr,
        interface: String,
        source: io::Error,
    },

    #[error("failed to send {protocol} query to {dst}: {source}")]
    Send {
        protocol: Protocol,
        dst: SocketAddr,
        source: io::Error,
    },

    #[error("failed to read from UDP socket {local}: {source}")]
    Receive { local: SocketAddr, source: io::Error },

    #[error("failed to decode {protocol} message from {from}: {reason}")]
    Decode {
        protocol: Protocol,
        from: SocketAddr,
        reason: String,
    },

    #[error("failed to build {protocol} query: {reason}")]
    Query { protocol: Protocol, reason: String },
}

/// One item of a scan's output stream.
#[derive(Debug)]
pub enum ScanEvent {
    Discovery(Discovery),
    Error(ScanError),
}
