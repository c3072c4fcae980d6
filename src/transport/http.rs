//! reqwest-backed transport

use super::{RawResponse, Result, Transport, TransportError};
use crate::request::{Method, Payload};
use async_trait::async_trait;
use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::debug;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            user_agent: concat!("codescrape/", env!("CARGO_PKG_VERSION")).to_string(),
            proxy: None,
        }
    }
}

/// Shared HTTP client; cloning is cheap and reuses the connection pool
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            // A 3xx is an answer in its own right; never follow it
            .redirect(reqwest::redirect::Policy::none());

        if let Some(url) = &config.proxy {
            let proxy = Proxy::all(url)
                .map_err(|e| TransportError::InvalidUrl(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        method: &Method,
        target: &str,
        payload: Option<&Payload>,
    ) -> Result<RawResponse> {
        let request = match method {
            Method::Get => self.client.get(target),
            Method::Post => {
                let request = self.client.post(target);
                match payload {
                    Some(fields) => request.form(fields),
                    None => request,
                }
            }
            Method::Other(verb) => return Err(TransportError::UnsupportedMethod(verb.clone())),
        };

        debug!(%method, url = target, "Sending request");

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(url = target, status = status.as_u16(), size = body.len(), "Response received");

        Ok(RawResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() {
        TransportError::InvalidUrl(e.to_string())
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::RequestFailed(e.to_string())
    }
}
