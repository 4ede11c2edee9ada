//! Command implementations

mod geocode;
mod inspect;
mod nearest;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Nearest(args) => nearest::execute(args, config_path, output).await,
        Commands::Inspect(args) => inspect::execute(args, config_path, output),
        Commands::Geocode(args) => geocode::execute(args, config_path, output).await,
    }
}
