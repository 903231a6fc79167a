//! Trawler CLI - Command-line interface
//!
//! Provides command-line access to Trawler functionality.

mod commands;

use clap::Parser;
use trawler_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "trawler")]
#[command(about = "A quality profile engine for media acquisition")]
struct Cli {
    /// Console log level; full debug logs always go to logs/
    #[arg(long, value_enum, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), None)?;

    commands::handle_command(cli.command).await?;

    Ok(())
}
