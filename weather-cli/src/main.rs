//! Binary crate for the `weather-agent` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Loading `.env` and initializing logging
//! - Prompting for a question and printing the answer

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);

    cmd.run().await
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "weather_agent_core=debug,weather_agent=debug"
    } else {
        "weather_agent_core=info,weather_agent=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
