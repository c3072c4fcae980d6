//! Classified result of executing one request

use crate::request::Request;
use crate::transport::{RawResponse, TransportError};
use bytes::Bytes;
use thiserror::Error;

pub const STATUS_OK: u16 = 200;
pub const STATUS_NOT_FOUND: u16 = 404;

/// A successful (status 200) exchange, as stored in the result sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub request: Request,
    pub status: u16,
    pub body: Bytes,
}

impl Response {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Why a request produced no response
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("unsupported method {0}")]
    UnsupportedMethod(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("transport panicked: {0}")]
    Panicked(String),
}

impl RequestError {
    /// Error class reported in `<kind> while working on <request>` lines
    pub fn kind(&self) -> &'static str {
        match self {
            RequestError::UnsupportedMethod(_) => "UnsupportedMethod",
            RequestError::Transport(e) => e.kind(),
            RequestError::Panicked(_) => "Panic",
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Success(Response),
    HttpError { status: u16, reason: String },
    TransportError(RequestError),
}

impl Outcome {
    /// Classify a completed exchange. Only 200 counts as success.
    pub fn from_raw(request: Request, raw: RawResponse) -> Self {
        if raw.status == STATUS_OK {
            Outcome::Success(Response {
                request,
                status: raw.status,
                body: raw.body,
            })
        } else {
            Outcome::HttpError {
                status: raw.status,
                reason: raw.reason,
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::HttpError { status, .. } if *status == STATUS_NOT_FOUND)
    }
}
