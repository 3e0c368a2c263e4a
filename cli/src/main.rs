mod commands;
mod terminal;

use commands::{CommandLine, Commands, scan};
use lanprobe_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    match commands.command {
        Commands::Scan {
            timeout,
            protocol,
            interface,
            verbose,
        } => {
            logging::init(verbose);
            print::header("starting scan");

            let cfg = Config {
                timeout,
                protocols: protocol.0,
                ..Config::default()
            };
            scan::scan(&cfg, &interface).await
        }
    }
}
