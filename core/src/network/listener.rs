use std::net::{Ipv4Addr, SocketAddr};

use lanprobe_common::{discovery::Discovery, error::ScanError};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::sink::EventSink;

/// Largest datagram a listener reads; the mDNS ceiling from RFC 6762.
pub const RECV_BUFFER_SIZE: usize = 9000;

/// Turns one datagram into zero or more discoveries.
///
/// An `Err` is reported and stops the listener.
pub type Decoder = fn(&[u8], SocketAddr) -> Result<Vec<Discovery>, ScanError>;

/// Reads datagrams from `socket` until it fails, a datagram fails to decode,
/// or the scan is cancelled. The socket is closed on return.
pub async fn listen(
    socket: UdpSocket,
    decoder: Decoder,
    sink: EventSink,
    cancel: CancellationToken,
) {
    let local: SocketAddr = socket
        .local_addr()
        .unwrap_or_else(|_| SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)));
    let mut buffer: Vec<u8> = vec![0u8; RECV_BUFFER_SIZE];
    debug!(%local, "listener started");

    'listen: loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => break,
            received = socket.recv_from(&mut buffer) => received,
        };

        let (size, from) = match received {
            Ok(received) => received,
            Err(source) => {
                sink.error(ScanError::Receive { local, source }).await;
                break;
            }
        };
        trace!(%local, %from, size, "datagram received");

        match decoder(&buffer[..size], from) {
            Ok(discoveries) => {
                for discovery in discoveries {
                    if !sink.discovery(discovery).await {
                        break 'listen;
                    }
                }
            }
            Err(err) => {
                sink.error(err).await;
                break;
            }
        }
    }

    debug!(%local, "listener stopped");
}
