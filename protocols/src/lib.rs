//! Wire formats for the discovery protocols: query builders, response
//! parsers and the multicast groups each address family talks to.

pub mod mdns;
pub mod ssdp;
