/// Per-URL outcome definitions
///
/// A [`Resource`] is created by the dispatcher with only its URL set, filled in
/// by exactly one worker, and read by the sink.
use std::fmt;
use thiserror::Error;

/// Final classification of a probed URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The numeric code of the last response received
    Http(u16),

    /// The redirect chain was longer than the configured bound
    RedirectLimit,
}

impl Status {
    /// Returns the HTTP code, if one was obtained
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Http(code) => Some(*code),
            Self::RedirectLimit => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{}", code),
            Self::RedirectLimit => write!(f, "-1"),
        }
    }
}

/// Outcome of evaluating robots.txt for a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RobotsStatus {
    Allowed,
    Disallowed,
}

impl RobotsStatus {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed {
            Self::Allowed
        } else {
            Self::Disallowed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Disallowed => "disallowed",
        }
    }
}

impl fmt::Display for RobotsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-URL failure recorded into the output row
///
/// The `Display` text of each variant is exactly what lands in the `error` column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// DNS, connect, TLS, timeout, or any other transport failure
    #[error("{0}")]
    Transport(String),

    #[error("invalid redirect location '{location}': {reason}")]
    MalformedLocation { location: String, reason: String },

    #[error("redirect response without Location header")]
    MissingLocation,

    #[error("max redirects number reached")]
    MaxRedirects,

    /// Soft signal: the response carried a bot-detection header
    #[error("bot-header")]
    BotHeader,
}

/// Structured outcome record for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// The input URL, never rewritten
    pub url: String,

    /// Final classification; `None` when no HTTP status was ever obtained
    pub status: Option<Status>,

    /// Number of 301/302 hops traversed
    pub redirects_followed: u32,

    /// URL of the last request, set only when at least one redirect occurred
    pub final_url: Option<String>,

    /// robots.txt verdict; `None` when no policy is configured
    pub robots_status: Option<RobotsStatus>,

    pub error: Option<ProbeError>,
}

impl Resource {
    /// Creates an unprobed resource for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            redirects_followed: 0,
            final_url: None,
            robots_status: None,
            error: None,
        }
    }

    /// Status column text: the code, `-1`, or `err` when no status was obtained
    pub fn status_text(&self) -> String {
        match &self.status {
            Some(status) => status.to_string(),
            None => "err".to_string(),
        }
    }

    /// Returns the HTTP code of the final response, if any
    pub fn status_code(&self) -> Option<u16> {
        self.status.as_ref().and_then(Status::code)
    }

    /// Returns true if the probe ended with a hard failure (no usable status)
    pub fn is_failure(&self) -> bool {
        matches!(
            self.error,
            Some(ProbeError::Transport(_))
                | Some(ProbeError::MalformedLocation { .. })
                | Some(ProbeError::MissingLocation)
                | Some(ProbeError::MaxRedirects)
        )
    }
}
