//! Network transport abstraction
//!
//! The downloader only needs something that can perform a GET or POST and
//! hand back the status line and body. [`HttpTransport`] is the reqwest-backed
//! implementation; tests substitute their own.

pub mod http;

use crate::request::{Method, Payload};
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use http::{HttpConfig, HttpTransport};

/// Failure before a status line was obtained
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to read body: {0}")]
    Body(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Method {0} is not supported by this transport")]
    UnsupportedMethod(String),
}

impl TransportError {
    /// Short class name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Timeout => "Timeout",
            TransportError::Connect(_) => "Connect",
            TransportError::InvalidUrl(_) => "InvalidUrl",
            TransportError::Body(_) => "Body",
            TransportError::RequestFailed(_) => "RequestFailed",
            TransportError::UnsupportedMethod(_) => "UnsupportedMethod",
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Status line and body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }
}

/// Executes a single network call
///
/// Implementations are shared by every worker and must be callable
/// concurrently without outside locking.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        method: &Method,
        target: &str,
        payload: Option<&Payload>,
    ) -> Result<RawResponse>;
}

