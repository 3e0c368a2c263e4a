//! # Discovery Protocols
//!
//! The closed set of protocols a scan can probe, and the parsers that turn
//! user input (`"s"`, `"mdns"`, `"SSDP,MDNS"`, ...) into them.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Simple Service Discovery Protocol (UPnP M-SEARCH).
    Ssdp,
    /// Multicast DNS.
    Mdns,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid protocol: {0}")]
pub struct ParseProtocolError(pub String);

impl Protocol {
    /// Short tag used inside discovery messages.
    pub fn tag(&self) -> &'static str {
        match self {
            Protocol::Ssdp => "SSDP",
            Protocol::Mdns => "mDNS",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Ssdp => f.write_str("SSDP"),
            Protocol::Mdns => f.write_str("MDNS"),
        }
    }
}

impl FromStr for Protocol {
    type Err = ParseProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_protocol(s)
    }
}

/// Parses a single protocol token.
///
/// Accepts the short codes `s` / `m` and the full names `ssdp` / `mdns`,
/// case-insensitively and ignoring surrounding whitespace.
pub fn parse_protocol(token: &str) -> Result<Protocol, ParseProtocolError> {
    let token: &str = token.trim();
    match token.to_ascii_lowercase().as_str() {
        "s" | "ssdp" => Ok(Protocol::Ssdp),
        "m" | "mdns" => Ok(Protocol::Mdns),
        _ => Err(ParseProtocolError(token.to_string())),
    }
}

/// Parses a comma separated list of protocols, keeping the given order.
///
/// The first invalid token fails the whole list.
pub fn parse_protocol_list(csv: &str) -> Result<Vec<Protocol>, ParseProtocolError> {
    csv.split(',').map(parse_protocol).collect()
}

/// An ordered protocol selection, parsed from a single comma separated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolList(pub Vec<Protocol>);

impl Default for ProtocolList {
    fn default() -> Self {
        Self(vec![Protocol::Ssdp, Protocol::Mdns])
    }
}

impl FromStr for ProtocolList {
    type Err = ParseProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_protocol_list(s).map(ProtocolList)
    }
}

impl fmt::Display for ProtocolList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        f.write_str(&names.join(","))
    }
}
