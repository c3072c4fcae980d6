use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codescrape")]
#[command(about = "Concurrent profile scraper and skill rater", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $CODESCRAPE_CONFIG or config/codescrape.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a list of URLs with a pool of workers
    Fetch(FetchArgs),
    /// Fetch everything known about a user profile
    Profile(ProfileArgs),
    /// Compute per-tag Elo ratings from a JSON problem list
    Rate(RateArgs),
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// URLs to GET
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Number of concurrent workers (overrides configuration)
    #[arg(short, long)]
    pub workers: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct ProfileArgs {
    /// Codeforces handle
    #[arg(long)]
    pub handle: String,

    /// Number of concurrent workers (overrides configuration)
    #[arg(short, long)]
    pub workers: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct RateArgs {
    /// JSON file holding an array of problems
    pub problems: PathBuf,

    /// Tag weight as TAG=WEIGHT; repeat for several tags
    #[arg(long = "weight", value_parser = parse_weight)]
    pub weights: Vec<(String, f64)>,
}

fn parse_weight(raw: &str) -> Result<(String, f64), String> {
    let (tag, weight) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TAG=WEIGHT, got '{}'", raw))?;
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|e| format!("invalid weight '{}': {}", weight, e))?;
    Ok((tag.trim().to_string(), weight))
}
