//! Request descriptors consumed by the downloader

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Form fields sent with a POST request
///
/// Scalar JSON values are accepted on input and kept as their JSON text
/// (`1` becomes `"1"`, `true` becomes `"true"`, `null` becomes `""`).
pub type Payload = BTreeMap<String, String>;

fn deserialize_payload<'de, D>(deserializer: D) -> Result<Option<Payload>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|fields| {
        fields
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect()
    }))
}

/// HTTP verb of a queued request
///
/// Only `Get` and `Post` are executed. Anything else is carried as `Other`
/// so the downloader can reject it explicitly instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Other(verb) => verb,
        }
    }
}

impl From<&str> for Method {
    fn from(verb: &str) -> Self {
        match verb.trim().to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            _ => Method::Other(verb.to_string()),
        }
    }
}

impl From<String> for Method {
    fn from(verb: String) -> Self {
        Method::from(verb.as_str())
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of work for the downloader
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub target: String,
    #[serde(
        default,
        deserialize_with = "deserialize_payload",
        skip_serializing_if = "Option::is_none"
    )]
    pub payload: Option<Payload>,
}

impl Request {
    pub fn get(target: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            target: target.into(),
            payload: None,
        }
    }

    pub fn post(target: impl Into<String>, payload: Payload) -> Self {
        Self {
            method: Method::Post,
            target: target.into(),
            payload: Some(payload),
        }
    }

    /// Build a request with an arbitrary verb (used for queue entries read from input)
    pub fn with_method(method: impl Into<Method>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            payload: None,
        }
    }

    /// Payload that should actually go on the wire. GET never carries one.
    pub fn effective_payload(&self) -> Option<&Payload> {
        match self.method {
            Method::Post => self.payload.as_ref(),
            Method::Get | Method::Other(_) => None,
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.target)
    }
}
