//! ## flodvakt
//! **Synthetic network traffic for live IDS dashboards**
//!
//! `serve` streams labelled packet events to WebSocket viewers and lets any
//! viewer switch the attack scenario for everyone. `build-capture` writes a
//! fixed pcap of normal browsing, a port scan and a UDP flood.

use clap::Parser;
use flodvakt_telemetry::EventLogger;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    EventLogger::init(&config.telemetry.log_level);

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await,
        Commands::BuildCapture(args) => commands::run_build_capture(args, config),
    }
}
