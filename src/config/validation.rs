use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("downloader.num_workers must be a positive integer")]
    ZeroWorkers,

    #[error("Timeout must be positive: {field}")]
    ZeroTimeout { field: String },

    #[error("http.user_agent must not be empty")]
    EmptyUserAgent,

    #[error("http.proxy must be an http(s) or socks5 URL, got '{proxy}'")]
    InvalidProxyScheme { proxy: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_downloader(config)?;
    validate_http(config)?;
    Ok(())
}

fn validate_downloader(config: &Config) -> Result<(), ValidationError> {
    if config.downloader.num_workers == 0 {
        return Err(ValidationError::ZeroWorkers);
    }
    Ok(())
}

fn validate_http(config: &Config) -> Result<(), ValidationError> {
    let http = &config.http;

    for (field, value) in [
        ("http.connect_timeout", http.connect_timeout),
        ("http.request_timeout", http.request_timeout),
    ] {
        if value.is_zero() {
            return Err(ValidationError::ZeroTimeout {
                field: field.to_string(),
            });
        }
    }

    if http.user_agent.trim().is_empty() {
        return Err(ValidationError::EmptyUserAgent);
    }

    if let Some(proxy) = &http.proxy {
        let scheme = proxy.split("://").next().unwrap_or_default();
        if !proxy.contains("://") || !matches!(scheme, "http" | "https" | "socks5" | "socks5h") {
            return Err(ValidationError::InvalidProxyScheme {
                proxy: proxy.clone(),
            });
        }
    }

    Ok(())
}
