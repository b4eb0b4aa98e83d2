use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use flodvakt_capture::build_capture_file;
use flodvakt_config::FlodvaktConfig;
use flodvakt_engine::server::shutdown_signal;
use flodvakt_engine::{SessionContext, StreamServer};
use tracing::info;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Configuration file to load instead of `config/flodvakt.yaml`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream synthetic traffic to WebSocket viewers
    Serve(ServeArgs),
    /// Write the fixed demo capture (normal, scan, flood) to a pcap file
    BuildCapture(BuildCaptureArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Overrides `server.bind_addr`
    #[arg(short, long)]
    pub bind: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct BuildCaptureArgs {
    /// Overrides `capture.output`
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Overrides `capture.seed`
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn load_config(&self) -> anyhow::Result<FlodvaktConfig> {
        let config = match &self.config {
            Some(path) => FlodvaktConfig::load_from_path(path),
            None => FlodvaktConfig::load(),
        };
        config.context("failed to load configuration")
    }
}

pub async fn run_serve(args: ServeArgs, mut config: FlodvaktConfig) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }

    let context = SessionContext::from_config(&config.generator)?;
    let server = StreamServer::bind(&config.server, context)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    server.run(shutdown_signal()).await?;
    Ok(())
}

pub fn run_build_capture(args: BuildCaptureArgs, config: FlodvaktConfig) -> anyhow::Result<()> {
    let output = args.output.unwrap_or(config.capture.output);
    let seed = args.seed.unwrap_or(config.capture.seed);

    let summary = build_capture_file(&output, seed)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        records = summary.records,
        bytes = summary.bytes,
        "Capture written to {}",
        summary.path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_bind_override() {
        let cli = Cli::parse_from(["flodvakt", "serve", "--bind", "0.0.0.0:9000"]);
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.bind.as_deref(), Some("0.0.0.0:9000")),
            _ => panic!("expected serve"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn parses_build_capture_flags() {
        let cli = Cli::parse_from([
            "flodvakt",
            "build-capture",
            "--output",
            "out.pcap",
            "--seed",
            "9",
            "--config",
            "custom.yaml",
        ]);
        match cli.command {
            Commands::BuildCapture(args) => {
                assert_eq!(args.output, Some(PathBuf::from("out.pcap")));
                assert_eq!(args.seed, Some(9));
            }
            _ => panic!("expected build-capture"),
        }
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let cli = Cli::parse_from(["flodvakt", "--config", "/nonexistent/flodvakt.yaml", "serve"]);
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn build_capture_honors_overrides() {
        let output = std::env::temp_dir().join(format!("flodvakt-cli-{}.pcap", std::process::id()));
        let args = BuildCaptureArgs {
            output: Some(output.clone()),
            seed: Some(3),
        };
        run_build_capture(args, FlodvaktConfig::default()).unwrap();
        assert!(std::fs::metadata(&output).unwrap().len() > 0);
        let _ = std::fs::remove_file(output);
    }
}
