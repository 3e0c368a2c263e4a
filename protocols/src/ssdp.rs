use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use thiserror::Error;

pub const SSDP_PORT: u16 = 1900;
pub const SSDP_MULTICAST_IPV4: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
pub const SSDP_MULTICAST_IPV6: Ipv6Addr = Ipv6Addr::new(0xff0e, 0, 0, 0, 0, 0, 0, 0xc);

/// Detail used when a datagram is not a readable HTTP response.
pub const PARSER_ERROR: &str = "[parser error]";
/// Detail used when a response carries no `Server` header.
pub const NO_SERVER: &str = "[no server]";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SsdpParseError {
    #[error("empty response")]
    Empty,
    #[error("response is not valid UTF-8")]
    NotText,
    #[error("malformed status line: {0}")]
    StatusLine(String),
    #[error("malformed header line: {0}")]
    Header(String),
}

/// Returns the SSDP group for the family of `local_addr`.
pub fn multicast_group(local_addr: &IpAddr) -> SocketAddr {
    match local_addr {
        IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(SSDP_MULTICAST_IPV4), SSDP_PORT),
        IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(SSDP_MULTICAST_IPV6), SSDP_PORT),
    }
}

/// Builds the M-SEARCH request sent to `group`.
pub fn create_msearch(group: &SocketAddr) -> String {
    let lines: [String; 5] = [
        "M-SEARCH * HTTP/1.1".to_string(),
        format!("HOST:{group}"),
        "MAN:\"ssdp:discover\"".to_string(),
        "ST: ssdp:all".to_string(),
        "MX: 1".to_string(),
    ];
    format!("{}\r\n\r\n", lines.join("\r\n"))
}

/// Parses an HTTP-style search response and returns its first `Server` value.
///
/// Returns `Ok(None)` for a well-formed response without a `Server` header.
pub fn get_server(payload: &[u8]) -> Result<Option<String>, SsdpParseError> {
    let text: &str = std::str::from_utf8(payload).map_err(|_| SsdpParseError::NotText)?;
    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

    let status_line: &str = lines.next().ok_or(SsdpParseError::Empty)?;
    if status_line.is_empty() {
        return Err(SsdpParseError::Empty);
    }
    validate_status_line(status_line)?;

    let mut server: Option<String> = None;
    for line in lines {
        if line.is_empty() {
            break;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| SsdpParseError::Header(line.to_string()))?;
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(SsdpParseError::Header(line.to_string()));
        }
        if server.is_none() && name.eq_ignore_ascii_case("server") {
            server = Some(value.trim().to_string());
        }
    }

    Ok(server)
}

/// Like [`get_server`], but always yields a printable detail.
pub fn server_detail(payload: &[u8]) -> String {
    match get_server(payload) {
        Ok(Some(server)) => server,
        Ok(None) => NO_SERVER.to_string(),
        Err(_) => PARSER_ERROR.to_string(),
    }
}

fn validate_status_line(line: &str) -> Result<(), SsdpParseError> {
    let invalid = || SsdpParseError::StatusLine(line.to_string());

    let (version, rest) = line.split_once(' ').ok_or_else(invalid)?;
    let (major, minor) = version
        .strip_prefix("HTTP/")
        .and_then(|v| v.split_once('.'))
        .ok_or_else(invalid)?;
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_number(major) || !is_number(minor) {
        return Err(invalid());
    }

    let code: &str = rest.trim_start().split(' ').next().unwrap_or_default();
    if code.len() != 3 || !is_number(code) {
        return Err(invalid());
    }

    Ok(())
}
