use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;

pub trait NetworkInterfaceExtension {
    /// Every address assigned to the interface, in the order the OS reports them.
    fn get_addresses(&self) -> Vec<IpAddr>;
    fn get_ipv4_addrs(&self) -> Vec<Ipv4Addr>;
    fn get_ipv6_addrs(&self) -> Vec<Ipv6Addr>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_addresses(&self) -> Vec<IpAddr> {
        self.ips.iter().map(IpNetwork::ip).collect()
    }

    fn get_ipv4_addrs(&self) -> Vec<Ipv4Addr> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(ipv4.ip())
                } else {
                    None
                }
            })
            .collect()
    }

    fn get_ipv6_addrs(&self) -> Vec<Ipv6Addr> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V6(ipv6) = ip {
                    Some(ipv6.ip())
                } else {
                    None
                }
            })
            .collect()
    }
}
