pub mod scan;

use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use lanprobe_common::{protocol::ProtocolList, utils::duration::parse_duration};

#[derive(Parser)]
#[command(name = "lanprobe")]
#[command(about = "Find SSDP and mDNS speakers on the local network.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe the local network and print every response
    #[command(alias = "s")]
    Scan {
        /// How long to listen for responses (e.g. 500ms, 1.5s, 1m30s)
        #[arg(short, long, default_value = "10s", value_parser = parse_duration)]
        timeout: Duration,

        /// Comma-separated protocols to probe with
        #[arg(short, long, default_value = "SSDP,MDNS")]
        protocol: ProtocolList,

        /// Only scan from this interface; may be repeated
        #[arg(short, long)]
        interface: Vec<String>,

        /// Raise the log level; may be repeated
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
