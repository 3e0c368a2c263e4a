use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lanprobe_common::{
    config::Config,
    discovery::Discovery,
    error::{ScanError, ScanEvent},
    protocol::Protocol,
};
use lanprobe_core::{
    ScanSession,
    network::listener::Decoder,
    scanner::{self, ScanContext, Scanner},
};
use lanprobe_protocols::ssdp::PARSER_ERROR;
use pnet::datalink::NetworkInterface;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// Binds a loopback socket, reports its address, then listens on it with the
/// given protocol's decoder.
struct LoopbackScanner {
    protocol: Protocol,
    decoder: Decoder,
    bound: Mutex<Option<oneshot::Sender<SocketAddr>>>,
}

impl LoopbackScanner {
    fn new(protocol: Protocol, decoder: Decoder) -> (Arc<Self>, oneshot::Receiver<SocketAddr>) {
        let (tx, rx) = oneshot::channel();
        let scanner = Arc::new(Self {
            protocol,
            decoder,
            bound: Mutex::new(Some(tx)),
        });
        (scanner, rx)
    }
}

#[async_trait]
impl Scanner for LoopbackScanner {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    async fn scan(&self, _interfaces: &[NetworkInterface], ctx: &ScanContext) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        ctx.spawn_listener(socket, self.decoder);

        if let Some(tx) = self.bound.lock().unwrap().take() {
            let _ = tx.send(addr);
        }
    }
}

fn config(timeout: Duration) -> Config {
    Config {
        timeout,
        ..Config::default()
    }
}

async fn collect(mut session: ScanSession) -> (Vec<Discovery>, Vec<ScanError>) {
    let mut discoveries = Vec::new();
    let mut errors = Vec::new();
    while let Some(event) = session.next_event().await {
        match event {
            ScanEvent::Discovery(discovery) => discoveries.push(discovery),
            ScanEvent::Error(err) => errors.push(err),
        }
    }
    session.shutdown().await;
    (discoveries, errors)
}

/// A DNS response with one uncompressed A record per address, named
/// `host0.local`, `host1.local` and so on.
fn mdns_response(addresses: &[[u8; 4]]) -> Vec<u8> {
    let mut packet = vec![0x00, 0x00, 0x84, 0x00, 0x00, 0x00];
    packet.extend_from_slice(&(addresses.len() as u16).to_be_bytes());
    packet.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    for (i, address) in addresses.iter().enumerate() {
        let label = format!("host{i}");
        packet.push(label.len() as u8);
        packet.extend_from_slice(label.as_bytes());
        packet.extend_from_slice(b"\x05local\x00");
        packet.extend_from_slice(&[0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x3c, 0x00, 0x04]);
        packet.extend_from_slice(address);
    }
    packet
}

#[tokio::test]
async fn ssdp_responses_become_discoveries() {
    let (scanner, bound) = LoopbackScanner::new(Protocol::Ssdp, scanner::ssdp::decode);
    let session = ScanSession::start_with(Vec::new(), vec![scanner], &config(Duration::from_millis(400)));

    let target = bound.await.unwrap();
    let device = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    device
        .send_to(b"HTTP/1.1 200 OK\r\nServer: TestDevice/1.0\r\nST: ssdp:all\r\n\r\n", target)
        .await
        .unwrap();
    device.send_to(b"\xff\xfe not http", target).await.unwrap();

    let (discoveries, errors) = collect(session).await;

    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(discoveries.len(), 2);
    assert_eq!(
        discoveries[0].message(),
        "127.0.0.1                [SSDP] TestDevice/1.0"
    );
    assert!(discoveries[1].message().ends_with(PARSER_ERROR));
    assert!(discoveries.iter().all(|d| d.protocol() == Protocol::Ssdp));
}

#[tokio::test]
async fn every_mdns_answer_is_a_discovery() {
    let (scanner, bound) = LoopbackScanner::new(Protocol::Mdns, scanner::mdns::decode);
    let session = ScanSession::start_with(Vec::new(), vec![scanner], &config(Duration::from_millis(400)));

    let target = bound.await.unwrap();
    let device = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    device
        .send_to(&mdns_response(&[[192, 168, 1, 30], [192, 168, 1, 31]]), target)
        .await
        .unwrap();

    let (discoveries, errors) = collect(session).await;

    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(discoveries.len(), 2);
    assert_eq!(
        discoveries[0].message(),
        "127.0.0.1                [mDNS] host0.local.\t60\tIN\tA\t192.168.1.30"
    );
    assert!(discoveries[1].message().ends_with("[mDNS] host1.local.\t60\tIN\tA\t192.168.1.31"));
}

#[tokio::test]
async fn undecodable_mdns_is_reported_once() {
    let (scanner, bound) = LoopbackScanner::new(Protocol::Mdns, scanner::mdns::decode);
    let session = ScanSession::start_with(Vec::new(), vec![scanner], &config(Duration::from_millis(400)));

    let target = bound.await.unwrap();
    let device = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    device.send_to(b"\x01\x02\x03", target).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    // The listener has stopped; this one is never read.
    let _ = device.send_to(&mdns_response(&[[10, 0, 0, 1]]), target).await;

    let (discoveries, errors) = collect(session).await;

    assert!(discoveries.is_empty());
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ScanError::Decode { protocol: Protocol::Mdns, .. }));
}

#[tokio::test]
async fn scanners_run_side_by_side() {
    let (ssdp, ssdp_bound) = LoopbackScanner::new(Protocol::Ssdp, scanner::ssdp::decode);
    let (mdns, mdns_bound) = LoopbackScanner::new(Protocol::Mdns, scanner::mdns::decode);
    let scanners: Vec<Arc<dyn Scanner>> = vec![ssdp, mdns];
    let session = ScanSession::start_with(Vec::new(), scanners, &config(Duration::from_millis(400)));

    let ssdp_target = ssdp_bound.await.unwrap();
    let mdns_target = mdns_bound.await.unwrap();
    let device = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    device
        .send_to(b"HTTP/1.1 200 OK\r\nSERVER: Linux UPnP/1.0\r\n\r\n", ssdp_target)
        .await
        .unwrap();
    device
        .send_to(&mdns_response(&[[192, 168, 1, 30]]), mdns_target)
        .await
        .unwrap();

    let (discoveries, _) = collect(session).await;

    assert_eq!(discoveries.len(), 2);
    assert!(discoveries.iter().any(|d| d.protocol() == Protocol::Ssdp));
    assert!(discoveries.iter().any(|d| d.protocol() == Protocol::Mdns));
}

#[tokio::test]
async fn empty_scan_ends_at_the_timeout() {
    let cfg = config(Duration::from_millis(100));
    let started = Instant::now();
    let session = ScanSession::start(Vec::new(), &cfg);

    let (discoveries, errors) = collect(session).await;

    let elapsed = started.elapsed();
    assert!(discoveries.is_empty());
    assert!(errors.is_empty());
    assert!(elapsed >= Duration::from_millis(100), "ended early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(200), "ended late: {elapsed:?}");
}
