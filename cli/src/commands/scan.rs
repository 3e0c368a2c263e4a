use std::time::Instant;

use lanprobe_common::{
    config::Config, error::ScanEvent, network::interface::get_scan_interfaces,
};
use lanprobe_core::ScanSession;
use pnet::datalink::NetworkInterface;
use tracing::{info, warn};

use crate::terminal::{print, spinner};

pub async fn scan(cfg: &Config, interface_names: &[String]) -> anyhow::Result<()> {
    let interfaces: Vec<NetworkInterface> = get_scan_interfaces(interface_names)?;
    for interface in &interfaces {
        info!(interface = %interface.name, ips = interface.ips.len(), "scanning from interface");
    }

    let started: Instant = Instant::now();
    let mut session: ScanSession = ScanSession::start(interfaces, cfg);
    spinner::start(session.remaining());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut discoveries: usize = 0;
    let mut errors: usize = 0;
    loop {
        let event: Option<ScanEvent> = tokio::select! {
            event = session.next_event() => event,
            _ = &mut ctrl_c => {
                warn!("interrupted, stopping scan");
                session.cancel();
                None
            }
        };

        match event {
            Some(ScanEvent::Discovery(discovery)) => {
                discoveries += 1;
                print::discovery(discovery.message());
            }
            Some(ScanEvent::Error(err)) => {
                errors += 1;
                print::error(&err);
            }
            None => break,
        }
        spinner::report_progress(discoveries, errors);
    }

    session.shutdown().await;
    spinner::stop();
    print::summary(discoveries, errors, started.elapsed());
    Ok(())
}
