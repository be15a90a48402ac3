use clap::Parser;
use log::info;
use tokio::signal::unix::{signal, SignalKind};

use simulator::{Fleet, Result};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulates a fleet of vents and temperature sensors against a hub server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Number of vent devices to simulate.
    #[arg(long, default_value_t = 1)]
    vents: usize,

    /// Number of sensor devices to simulate.
    #[arg(long, default_value_t = 1)]
    sensors: usize,

    /// WebSocket address of the hub server.
    #[arg(long, default_value = "ws://localhost:8081")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init_timed();

    let cli = Cli::parse();

    info!("simulator version {VERSION}");

    let fleet = Fleet::start(&cli.server, cli.vents, cli.sensors).await?;

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = interrupt.recv() => info!("got SIGINT, shutting down..."),
        _ = terminate.recv() => info!("got SIGTERM, shutting down..."),
    };

    fleet.shutdown().await;

    Ok(())
}
