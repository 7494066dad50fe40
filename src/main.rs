mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    distfetch::observability::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch(args) => commands::fetch(cli.config, args).await?,
        Commands::DistPath(args) => commands::dist_path(cli.config, args)?,
    }

    Ok(())
}
