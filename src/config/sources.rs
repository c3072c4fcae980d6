use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "CODESCRAPE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/codescrape.toml";
const ENV_PREFIX: &str = "CODESCRAPE";
const ENV_SEPARATOR: &str = "__";

/// Path of the configuration file: `CODESCRAPE_CONFIG` or the default location
pub fn default_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    load_from_sources(default_path())
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::debug!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // CODESCRAPE__DOWNLOADER__NUM_WORKERS -> downloader.num_workers
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanize::HumanDuration;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.downloader.num_workers, 25);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[downloader]
num_workers = 8

[http]
connect_timeout = "3s"
request_timeout = 15000
user_agent = "test-agent/1.0"
proxy = "http://proxy:8080"

[logging]
level = "debug"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.downloader.num_workers, 8);
        assert_eq!(config.http.connect_timeout, HumanDuration::from_secs(3));
        assert_eq!(config.http.request_timeout, HumanDuration::from_secs(15));
        assert_eq!(config.http.user_agent, "test-agent/1.0");
        assert_eq!(config.http.proxy.as_deref(), Some("http://proxy:8080"));
        assert_eq!(config.logging.level, "debug");
    }

    // Environment overrides are not exercised here: setting process env vars
    // is unsafe in edition 2024 and races with parallel tests.
}
