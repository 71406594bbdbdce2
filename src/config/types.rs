use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// User agent sent when neither a file value nor a CLI flag is given
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/109.0";

/// Agent name evaluated against robots.txt when none is configured
pub const DEFAULT_ROBOTS_AGENT: &str = "Googlebot";

/// Main configuration structure for the checker
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub checker: CheckerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub retry: RetryConfig,
    pub robots: RobotsConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Worker pool and probe behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Number of parallel workers making requests
    pub workers: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Redirect hops followed before giving up with status -1
    #[serde(rename = "max-redirects")]
    pub max_redirects: u32,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            request_timeout_secs: 60,
            max_redirects: 10,
        }
    }
}

impl CheckerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// User agent selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// User agent string sent with every request
    pub value: String,

    /// Draw a fresh random user agent for every attempt, ignoring `value`
    pub random: bool,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
            random: false,
        }
    }
}

/// Backoff envelope around a single probe
///
/// The default multiplier is below 1.0, so intervals narrow after the first
/// backoff step instead of widening.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    #[serde(rename = "initial-interval-ms")]
    pub initial_interval_ms: u64,

    pub multiplier: f64,

    #[serde(rename = "max-interval-ms")]
    pub max_interval_ms: u64,

    /// Total time budget across all attempts for one URL
    #[serde(rename = "max-elapsed-ms")]
    pub max_elapsed_ms: u64,

    /// Jitter applied to every interval, as a fraction of it
    #[serde(rename = "randomization-factor")]
    pub randomization_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 1_000,
            multiplier: 0.5,
            max_interval_ms: 60_000,
            max_elapsed_ms: 120_000,
            randomization_factor: 0.5,
        }
    }
}

/// robots.txt evaluation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    /// URL or local path of the robots.txt document; unset disables evaluation
    pub source: Option<String>,

    /// Agent name the document is evaluated for
    pub agent: String,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            source: None,
            agent: DEFAULT_ROBOTS_AGENT.to_string(),
        }
    }
}

/// Input locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// File with one URL per line
    #[serde(rename = "urls-path")]
    pub urls_path: PathBuf,

    /// File with one ignore regex per line
    #[serde(rename = "ignore-path")]
    pub ignore_path: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            urls_path: PathBuf::from("urls.txt"),
            ignore_path: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file; an existing file is overwritten
    #[serde(rename = "csv-path")]
    pub csv_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("output.csv"),
        }
    }
}
