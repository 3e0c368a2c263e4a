use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV6};

use anyhow::{Context, Result};
use dns_parser::{Builder, Packet, QueryClass, QueryType, RData, ResourceRecord};

pub const MDNS_PORT: u16 = 5353;
pub const MDNS_MULTICAST_IPV4: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);
pub const MDNS_MULTICAST_IPV6: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 0xfb);

/// Service the discovery query asks for.
pub const SERVICE_NAME: &str = "_googlecast._tcp.local";

/// Returns the mDNS group for the family of `local_addr`.
///
/// The IPv6 group is link-local, so it carries the interface `scope_id`.
pub fn multicast_group(local_addr: &IpAddr, scope_id: u32) -> SocketAddr {
    match local_addr {
        IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(MDNS_MULTICAST_IPV4), MDNS_PORT),
        IpAddr::V6(_) => {
            SocketAddr::V6(SocketAddrV6::new(MDNS_MULTICAST_IPV6, MDNS_PORT, 0, scope_id))
        }
    }
}

/// Builds the PTR query for [`SERVICE_NAME`].
///
/// Recursion is not requested and the question's top class bit asks for a
/// unicast reply (RFC 6762, section 18.12).
pub fn create_query_packet(id: u16) -> Result<Vec<u8>> {
    let mut builder: Builder = Builder::new_query(id, false);
    builder.add_question(SERVICE_NAME, true, QueryType::PTR, QueryClass::IN);
    builder
        .build()
        .map_err(|_| anyhow::anyhow!("mDNS query for {SERVICE_NAME} was truncated"))
}

/// Same as [`create_query_packet`] with a random transaction id.
pub fn create_random_query_packet() -> Result<Vec<u8>> {
    create_query_packet(rand::random::<u16>())
}

/// Decodes a DNS message and renders every answer record as text.
pub fn extract_answers(data: &[u8]) -> Result<Vec<String>> {
    let packet = Packet::parse(data).context("failed to parse mDNS packet")?;
    Ok(packet.answers.iter().map(record_to_string).collect())
}

/// Renders a record in zone-file presentation form:
/// `name.<TAB>ttl<TAB>class<TAB>type<TAB>data`.
pub fn record_to_string(record: &ResourceRecord) -> String {
    let (rtype, data): (&str, String) = match &record.data {
        RData::A(a) => ("A", a.0.to_string()),
        RData::AAAA(aaaa) => ("AAAA", aaaa.0.to_string()),
        RData::CNAME(cname) => ("CNAME", format!("{}.", cname.0)),
        RData::NS(ns) => ("NS", format!("{}.", ns.0)),
        RData::PTR(ptr) => ("PTR", format!("{}.", ptr.0)),
        RData::MX(mx) => ("MX", format!("{} {}.", mx.preference, mx.exchange)),
        RData::SRV(srv) => (
            "SRV",
            format!("{} {} {} {}.", srv.priority, srv.weight, srv.port, srv.target),
        ),
        RData::SOA(soa) => (
            "SOA",
            format!(
                "{}. {}. {} {} {} {} {}",
                soa.primary_ns,
                soa.mailbox,
                soa.serial,
                soa.refresh,
                soa.retry,
                soa.expire,
                soa.minimum_ttl
            ),
        ),
        RData::TXT(txt) => {
            let strings: Vec<String> = txt
                .iter()
                .map(|s| format!("\"{}\"", String::from_utf8_lossy(s)))
                .collect();
            ("TXT", strings.join(" "))
        }
        RData::Unknown(raw) => ("TYPE?", format!("\\# {}", raw.len())),
    };

    format!(
        "{}.\t{}\t{:?}\t{}\t{}",
        record.name, record.ttl, record.cls, rtype, data
    )
}
