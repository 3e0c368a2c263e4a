//! An **SSDP** scanner.
//!
//! Sends one `M-SEARCH` from every interface address and collects the unicast
//! HTTP replies that come back to that same socket.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use lanprobe_common::{
    discovery::Discovery, error::ScanError, protocol::Protocol,
    utils::interface::NetworkInterfaceExtension,
};
use lanprobe_protocols::ssdp;
use pnet::datalink::NetworkInterface;
use tokio::net::UdpSocket;
use tracing::{debug, trace};

use super::{ScanContext, Scanner};
use crate::network::socket;

pub struct SsdpScanner;

#[async_trait]
impl Scanner for SsdpScanner {
    fn protocol(&self) -> Protocol {
        Protocol::Ssdp
    }

    async fn scan(&self, interfaces: &[NetworkInterface], ctx: &ScanContext) {
        for interface in interfaces {
            for ip in interface.get_addresses() {
                if ctx.is_cancelled() {
                    return;
                }
                if let Err(err) = probe_address(interface, ip, ctx).await {
                    ctx.report(err).await;
                }
            }
        }
    }
}

/// Binds to `ip`, sends the M-SEARCH and leaves a listener on the socket.
///
/// On failure nothing is left running for this address.
async fn probe_address(
    interface: &NetworkInterface,
    ip: IpAddr,
    ctx: &ScanContext,
) -> Result<(), ScanError> {
    let group: SocketAddr = ssdp::multicast_group(&ip);
    let socket: UdpSocket = socket::bind_probe_socket(interface, ip)?;

    send_msearch(&socket, group).await?;
    debug!(interface = %interface.name, %ip, %group, "M-SEARCH sent");

    ctx.spawn_listener(socket, decode);
    Ok(())
}

pub async fn send_msearch(socket: &UdpSocket, group: SocketAddr) -> Result<(), ScanError> {
    let request: String = ssdp::create_msearch(&group);
    socket
        .send_to(request.as_bytes(), group)
        .await
        .map_err(|source| ScanError::Send {
            protocol: Protocol::Ssdp,
            dst: group,
            source,
        })?;
    Ok(())
}

/// Listener decoder: every datagram is a discovery, readable or not.
pub fn decode(payload: &[u8], from: SocketAddr) -> Result<Vec<Discovery>, ScanError> {
    let server: String = ssdp::server_detail(payload);
    trace!(%from, %server, "SSDP response");
    Ok(vec![Discovery::new(Protocol::Ssdp, from.ip(), &server)])
}
