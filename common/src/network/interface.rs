//! # Scan Interfaces
//!
//! Enumerates the host's network interfaces and keeps the ones a multicast
//! discovery scan can actually use.

use pnet::datalink::{self, NetworkInterface};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// Loopback never reaches another device.
    IsLoopback,
    /// The interface does not support multicast.
    NoMulticast,
    /// The interface has no address to bind a probe socket to.
    NoAddresses,
}

#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("no usable network interfaces found")]
    NoUsableInterfaces,
    #[error("unknown network interface: {0}")]
    UnknownInterface(String),
}

/// Enumerates the host's interfaces and returns the ones worth scanning.
///
/// When `names` is non-empty only those interfaces are considered.
pub fn get_scan_interfaces(names: &[String]) -> Result<Vec<NetworkInterface>, InterfaceError> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    debug!(count = interfaces.len(), "enumerated network interfaces");
    select_scan_interfaces(interfaces, names)
}

pub fn select_scan_interfaces(
    interfaces: Vec<NetworkInterface>,
    names: &[String],
) -> Result<Vec<NetworkInterface>, InterfaceError> {
    if let Some(missing) = names
        .iter()
        .find(|name| !interfaces.iter().any(|iface| &iface.name == *name))
    {
        return Err(InterfaceError::UnknownInterface(missing.clone()));
    }

    let selected: Vec<NetworkInterface> = interfaces
        .into_iter()
        .filter(|iface| names.is_empty() || names.contains(&iface.name))
        .filter(|iface| match is_viable_scan_interface(iface) {
            Ok(()) => true,
            Err(reason) => {
                debug!(interface = %iface.name, ?reason, "skipping interface");
                false
            }
        })
        .collect();

    if selected.is_empty() {
        return Err(InterfaceError::NoUsableInterfaces);
    }

    Ok(selected)
}

fn is_viable_scan_interface(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if !interface.is_multicast() {
        return Err(ViabilityError::NoMulticast);
    }
    if interface.ips.is_empty() {
        return Err(ViabilityError::NoAddresses);
    }

    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
