pub mod config;
pub mod downloader;
pub mod humanize;
pub mod observability;
pub mod outcome;
pub mod profile;
pub mod queue;
pub mod rating;
pub mod request;
pub mod transport;

pub use downloader::{Downloader, DownloaderError};
pub use outcome::{Outcome, Response};
pub use queue::TaskQueue;
pub use request::{Method, Request};
pub use transport::{HttpTransport, Transport};
