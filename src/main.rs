mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use codescrape::observability;

#[tokio::main]
async fn main() -> Result<(), commands::AnyError> {
    let cli = Cli::parse();

    let workers = match &cli.command {
        Commands::Fetch(args) => args.workers,
        Commands::Profile(args) => args.workers,
        Commands::Rate(_) => None,
    };
    let config = commands::load_config(cli.config.as_deref(), workers)?;

    observability::init_tracing(&config.logging.level);

    match cli.command {
        Commands::Fetch(args) => commands::fetch(&config, args.urls).await?,
        Commands::Profile(args) => commands::profile(&config, args.handle).await?,
        Commands::Rate(args) => commands::rate(&args.problems, args.weights)?,
    }

    Ok(())
}
