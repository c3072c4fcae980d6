//! Queue population from a user's profile fields

use crate::queue::TaskQueue;
use crate::request::Request;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const CODEFORCES_BASE: &str = "https://codeforces.com";

/// Profile fields a scrape can be derived from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: Option<String>,
    pub email: Option<String>,
    pub codeforces_handle: Option<String>,
    pub location: Option<String>,
}

impl User {
    pub fn with_codeforces_handle(handle: impl Into<String>) -> Self {
        Self {
            codeforces_handle: Some(handle.into()),
            ..Default::default()
        }
    }
}

/// Requests worth fetching for this user
///
/// Only the Codeforces handle maps to known sources today; the other fields
/// are carried for future sources and produce nothing.
pub fn build_requests(user: &User) -> Vec<Request> {
    let mut requests = Vec::new();

    if let Some(handle) = non_blank(user.codeforces_handle.as_deref()) {
        requests.extend(codeforces_requests(handle));
    }

    debug!(count = requests.len(), "Built requests from profile");
    requests
}

/// Enqueue everything [`build_requests`] produces, returning how many were added
pub fn enqueue_user(queue: &TaskQueue, user: &User) -> usize {
    let requests = build_requests(user);
    let count = requests.len();
    for request in requests {
        queue.enqueue(request);
    }
    count
}

fn codeforces_requests(handle: &str) -> Vec<Request> {
    let mut requests = Vec::with_capacity(3);

    match Url::parse(CODEFORCES_BASE) {
        Ok(mut profile) => {
            if let Ok(mut segments) = profile.path_segments_mut() {
                segments.clear().push("profile").push(handle);
            }
            requests.push(Request::get(profile.to_string()));
        }
        Err(e) => warn!(error = %e, "Invalid Codeforces base URL"),
    }

    let api = [
        ("user.info", "handles"),
        ("user.status", "handle"),
    ];
    for (method, param) in api {
        let endpoint = format!("{}/api/{}", CODEFORCES_BASE, method);
        match Url::parse_with_params(&endpoint, &[(param, handle)]) {
            Ok(url) => requests.push(Request::get(url.to_string())),
            Err(e) => warn!(error = %e, endpoint, "Failed to build Codeforces API URL"),
        }
    }

    requests
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
