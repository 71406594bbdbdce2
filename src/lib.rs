//! Site URL Checker: bulk HTTP status checking for URL lists
//!
//! This crate probes every URL of a list with header-only requests, follows
//! redirects by hand, retries rate-limited answers with backoff, optionally
//! evaluates a robots.txt policy, and writes one CSV row per URL.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod requester;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for setup and pipeline operations
///
/// Per-URL failures never surface here; they are recorded in the
/// corresponding [`state::Resource`] instead.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to fetch robots.txt from {url}: HTTP {status}")]
    RobotsFetch { url: String, status: u16 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Worker pool stopped before all URLs were dispatched")]
    WorkersStopped,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Invalid ignore pattern on line {line}: {source}")]
    InvalidPattern { line: usize, source: regex::Error },

    #[error("Invalid ignore pattern set: {0}")]
    PatternSet(#[from] regex::Error),

    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Result type alias for checker operations
pub type Result<T> = std::result::Result<T, CheckerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{Pipeline, RunSummary};
pub use state::{ProbeError, Resource, RobotsStatus, Status};
