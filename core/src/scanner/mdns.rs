//! A **multicast DNS** scanner.
//!
//! Per interface it listens on the IPv4 and IPv6 mDNS groups, then sends a
//! unicast-preferred PTR query from every interface address and listens for
//! the direct replies on those probe sockets.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use lanprobe_common::{
    config::SetupFailurePolicy, discovery::Discovery, error::ScanError, protocol::Protocol,
    utils::interface::NetworkInterfaceExtension,
};
use lanprobe_protocols::mdns::{self, MDNS_MULTICAST_IPV4, MDNS_MULTICAST_IPV6, MDNS_PORT};
use pnet::datalink::NetworkInterface;
use tokio::net::UdpSocket;
use tracing::debug;

use super::{ScanContext, Scanner};
use crate::network::socket;

pub struct MdnsScanner {
    policy: SetupFailurePolicy,
}

#[async_trait]
impl Scanner for MdnsScanner {
    fn protocol(&self) -> Protocol {
        Protocol::Mdns
    }

    async fn scan(&self, interfaces: &[NetworkInterface], ctx: &ScanContext) {
        for interface in interfaces {
            if ctx.is_cancelled() {
                return;
            }
            self.scan_interface(interface, ctx).await;
        }
    }
}

impl MdnsScanner {
    pub fn new(policy: SetupFailurePolicy) -> Self {
        Self { policy }
    }

    async fn scan_interface(&self, interface: &NetworkInterface, ctx: &ScanContext) {
        let joined_v4 = socket::join_multicast_v4(interface, MDNS_MULTICAST_IPV4, MDNS_PORT);
        if !self.settle(joined_v4.map(|s| listen_on(s, ctx)), ctx).await {
            return;
        }

        let joined_v6 = socket::join_multicast_v6(interface, MDNS_MULTICAST_IPV6, MDNS_PORT);
        if !self.settle(joined_v6.map(|s| listen_on(s, ctx)), ctx).await {
            return;
        }

        for ip in interface.get_addresses() {
            if ctx.is_cancelled() {
                return;
            }
            let queried = query_from(interface, ip, ctx).await;
            if !self.settle(queried, ctx).await {
                return;
            }
        }
    }

    /// Reports a failed step. Returns whether the interface setup goes on.
    async fn settle(&self, step: Result<(), ScanError>, ctx: &ScanContext) -> bool {
        match step {
            Ok(()) => true,
            Err(err) => {
                ctx.report(err).await;
                self.policy == SetupFailurePolicy::Continue
            }
        }
    }
}

fn listen_on(socket: Option<UdpSocket>, ctx: &ScanContext) {
    if let Some(socket) = socket {
        ctx.spawn_listener(socket, decode);
    }
}

/// Binds to `ip`, sends the PTR query to the family's group and leaves a
/// listener on the socket for unicast replies.
async fn query_from(
    interface: &NetworkInterface,
    ip: IpAddr,
    ctx: &ScanContext,
) -> Result<(), ScanError> {
    let group: SocketAddr = mdns::multicast_group(&ip, interface.index);
    let socket: UdpSocket = socket::bind_probe_socket(interface, ip)?;

    send_query(&socket, group).await?;
    debug!(interface = %interface.name, %ip, %group, "mDNS query sent");

    ctx.spawn_listener(socket, decode);
    Ok(())
}

pub async fn send_query(socket: &UdpSocket, group: SocketAddr) -> Result<(), ScanError> {
    let query: Vec<u8> =
        mdns::create_random_query_packet().map_err(|err| ScanError::Query {
            protocol: Protocol::Mdns,
            reason: format!("{err:#}"),
        })?;
    socket
        .send_to(&query, group)
        .await
        .map_err(|source| ScanError::Send {
            protocol: Protocol::Mdns,
            dst: group,
            source,
        })?;
    Ok(())
}

/// Listener decoder: one discovery per answer record.
pub fn decode(payload: &[u8], from: SocketAddr) -> Result<Vec<Discovery>, ScanError> {
    let answers: Vec<String> =
        mdns::extract_answers(payload).map_err(|err| ScanError::Decode {
            protocol: Protocol::Mdns,
            from,
            reason: format!("{err:#}"),
        })?;

    Ok(answers
        .iter()
        .map(|answer| Discovery::new(Protocol::Mdns, from.ip(), answer))
        .collect())
}
