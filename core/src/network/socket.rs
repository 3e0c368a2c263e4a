//! UDP socket construction.
//!
//! Two kinds of sockets are opened during a scan:
//! * **probe sockets**, bound to one interface address on an ephemeral port.
//!   Queries leave through them and unicast replies come back to them.
//! * **group sockets**, bound to a protocol port with address reuse and
//!   joined to a multicast group on one interface.
//!
//! Everything is built through `socket2` so options can be set before the
//! bind, then handed to Tokio.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

use lanprobe_common::{error::ScanError, utils::interface::NetworkInterfaceExtension};
use pnet::datalink::NetworkInterface;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::debug;

/// Local address a probe socket binds to.
///
/// The port is ephemeral. Link-local IPv6 addresses are scoped to the
/// interface, anything else is left unscoped.
pub fn probe_bind_addr(interface: &NetworkInterface, ip: IpAddr) -> SocketAddr {
    match ip {
        IpAddr::V4(ipv4) => SocketAddr::V4(SocketAddrV4::new(ipv4, 0)),
        IpAddr::V6(ipv6) => {
            let scope_id: u32 = if ipv6.is_unicast_link_local() {
                interface.index
            } else {
                0
            };
            SocketAddr::V6(SocketAddrV6::new(ipv6, 0, 0, scope_id))
        }
    }
}

/// Opens a probe socket on `ip`, with outgoing multicast pinned to `interface`.
pub fn bind_probe_socket(interface: &NetworkInterface, ip: IpAddr) -> Result<UdpSocket, ScanError> {
    let addr: SocketAddr = probe_bind_addr(interface, ip);
    let socket: UdpSocket =
        open_probe_socket(interface, addr).map_err(|source| ScanError::Bind { addr, source })?;
    debug!(interface = %interface.name, %addr, "probe socket bound");
    Ok(socket)
}

fn open_probe_socket(interface: &NetworkInterface, addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
    match addr {
        SocketAddr::V4(v4) => socket.set_multicast_if_v4(v4.ip())?,
        SocketAddr::V6(_) => {
            socket.set_only_v6(true)?;
            socket.set_multicast_if_v6(interface.index)?;
        }
    }
    socket.bind(&addr.into())?;
    into_tokio(socket)
}

/// Joins an IPv4 group on the interface's first IPv4 address.
///
/// Returns `Ok(None)` when the interface has no IPv4 address to join with.
pub fn join_multicast_v4(
    interface: &NetworkInterface,
    group: Ipv4Addr,
    port: u16,
) -> Result<Option<UdpSocket>, ScanError> {
    let Some(iface_addr) = interface.get_ipv4_addrs().first().copied() else {
        debug!(interface = %interface.name, %group, "no IPv4 address, skipping group");
        return Ok(None);
    };

    // Binding to the group keeps unrelated unicast traffic out on Linux;
    // other platforms only deliver group traffic to a wildcard bind.
    let bind_ip: Ipv4Addr = if cfg!(target_os = "linux") {
        group
    } else {
        Ipv4Addr::UNSPECIFIED
    };
    let addr = SocketAddr::new(IpAddr::V4(bind_ip), port);

    let socket: Socket =
        reusable_socket(Domain::IPV4, addr).map_err(|source| ScanError::Bind { addr, source })?;
    socket
        .join_multicast_v4(&group, &iface_addr)
        .map_err(|source| ScanError::Join {
            group: IpAddr::V4(group),
            interface: interface.name.clone(),
            source,
        })?;

    debug!(interface = %interface.name, %group, %iface_addr, "joined multicast group");
    into_tokio(socket)
        .map(Some)
        .map_err(|source| ScanError::Bind { addr, source })
}

/// Joins an IPv6 group on the interface index.
///
/// Returns `Ok(None)` when the interface has no IPv6 address.
pub fn join_multicast_v6(
    interface: &NetworkInterface,
    group: Ipv6Addr,
    port: u16,
) -> Result<Option<UdpSocket>, ScanError> {
    if interface.get_ipv6_addrs().is_empty() {
        debug!(interface = %interface.name, %group, "no IPv6 address, skipping group");
        return Ok(None);
    }

    let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port);
    let socket: Socket =
        reusable_socket(Domain::IPV6, addr).map_err(|source| ScanError::Bind { addr, source })?;
    socket
        .join_multicast_v6(&group, interface.index)
        .map_err(|source| ScanError::Join {
            group: IpAddr::V6(group),
            interface: interface.name.clone(),
            source,
        })?;

    debug!(interface = %interface.name, %group, index = interface.index, "joined multicast group");
    into_tokio(socket)
        .map(Some)
        .map_err(|source| ScanError::Bind { addr, source })
}

fn reusable_socket(domain: Domain, addr: SocketAddr) -> io::Result<Socket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;

    #[cfg(all(unix, not(target_os = "solaris"), not(target_os = "illumos")))]
    socket.set_reuse_port(true)?;

    if domain == Domain::IPV6 {
        socket.set_only_v6(true)?;
    }
    socket.bind(&addr.into())?;
    Ok(socket)
}

fn into_tokio(socket: Socket) -> io::Result<UdpSocket> {
    socket.set_nonblocking(true)?;
    UdpSocket::from_std(socket.into())
}
