//! Shared model for lanprobe: protocols, discovery records, scan errors,
//! configuration and the network interfaces a scan runs over.

pub mod config;
pub mod discovery;
pub mod error;
pub mod network;
pub mod protocol;
pub mod utils;
