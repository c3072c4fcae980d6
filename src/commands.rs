use codescrape::config::{Config, ConfigError};
use codescrape::downloader::Downloader;
use codescrape::outcome::Response;
use codescrape::profile::{self, User};
use codescrape::queue::TaskQueue;
use codescrape::rating::{self, Problem};
use codescrape::request::Request;
use codescrape::transport::HttpTransport;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Load configuration, preferring an explicit path, then apply the worker override
pub fn load_config(path: Option<&Path>, workers: Option<usize>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => Config::load_from_path(path.to_path_buf())?,
        None => Config::load()?,
    };

    if let Some(workers) = workers {
        config.downloader.num_workers = workers;
        config.validate()?;
    }

    Ok(config)
}

pub async fn fetch(config: &Config, urls: Vec<String>) -> Result<(), AnyError> {
    let queue: TaskQueue = urls.into_iter().map(Request::get).collect();
    download(config, queue).await
}

pub async fn profile(config: &Config, handle: String) -> Result<(), AnyError> {
    let queue = TaskQueue::new();
    let user = User::with_codeforces_handle(handle);
    let count = profile::enqueue_user(&queue, &user);
    info!(count, "Queued profile requests");

    download(config, queue).await
}

pub fn rate(problems_path: &Path, weights: Vec<(String, f64)>) -> Result<(), AnyError> {
    let raw = std::fs::read_to_string(problems_path)?;
    let problems: Vec<Problem> = serde_json::from_str(&raw)?;

    let ratings = rating::elo_ratings(&problems);
    for (tag, value) in &ratings {
        println!("{:<24} {:>8.1}", tag, value);
    }

    if !weights.is_empty() {
        let weights: BTreeMap<String, f64> = weights.into_iter().collect();
        let relevant: BTreeMap<String, f64> = ratings
            .into_iter()
            .filter(|(tag, _)| weights.contains_key(tag))
            .collect();
        let combined = rating::combine_ratings(&relevant, &weights)?;
        println!("{:<24} {:>8.1}", "combined", combined);
    }

    Ok(())
}

async fn download(config: &Config, queue: TaskQueue) -> Result<(), AnyError> {
    let transport = Arc::new(HttpTransport::new(&config.http.to_http_config())?);
    let downloader = Downloader::from_config(transport, Arc::new(queue), &config.downloader)?;
    let stats = downloader.stats();

    let started = Instant::now();
    let responses = downloader.run().await;
    let elapsed = started.elapsed();

    print_responses(&responses);

    let snapshot = stats.snapshot();
    println!(
        "{} / {} succeeded ({} HTTP errors, {} not found, {} failed) in {:.2?}",
        snapshot.succeeded,
        snapshot.total,
        snapshot.http_errors,
        snapshot.not_found,
        snapshot.failed,
        elapsed
    );

    Ok(())
}

fn print_responses(responses: &[Response]) {
    for response in responses {
        println!(
            "{} {} ({} bytes)",
            response.status,
            response.request.target,
            response.body.len()
        );
    }
}
