mod cli;
mod telemetry;

use bmp_core::{BmpEngine, EngineConfig};
use clap::Parser;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    let config = tracing::subscriber::with_default(
        telemetry::bootstrap_subscriber(std::io::stderr),
        EngineConfig::load,
    )?;
    telemetry::init(&config.logging);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting bmp");

    let engine = BmpEngine::from_config(&config)?;
    let output = cli::run(&engine, args.command)?;
    println!("{}", cli::render(output, config.output.precision)?);
    Ok(())
}
