//! geopair CLI - Command-line interface
//!
//! Finds the nearest neighbour of every point in a CSV file.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod output_types;
mod progress;

use clap::Parser;
use cli::Cli;
use output::OutputWriter;

fn main() {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    let outcome = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(commands::execute(cli, &output)));

    if let Err(error) = outcome {
        let error = errors::from_anyhow(error);
        if output.is_json() {
            output.error(&error);
        } else {
            error.display();
        }
        std::process::exit(1);
    }
}
