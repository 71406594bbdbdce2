//! Single header-only probe of a URL
//!
//! A probe sends HEAD requests, follows 301/302 responses by hand up to a
//! bound, and classifies the final response. It never retries; the retry
//! envelope lives in [`super::retry`].

use crate::state::{ProbeError, Resource, Status};
use crate::url::resolve_redirect;
use reqwest::header::{HeaderValue, LOCATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use url::Url;

/// Header some CDNs add to responses served to suspected bots
pub const BOT_HEADER: &str = "x-tncms-bot-tier";

/// Outcome of one probe, as seen by the retry envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// Final for this URL
    Settled(Resource),
    /// Rate limited or method rejected up front; worth another probe
    Transient(Resource),
}

impl Attempt {
    /// Classifies a finished probe
    ///
    /// 429 is always transient. 405 is transient only when it answered the
    /// very first request: a 405 reached through a redirect ends the chain.
    pub fn classify(resource: Resource) -> Self {
        match resource.status_code() {
            Some(429) => Self::Transient(resource),
            Some(405) if resource.redirects_followed == 0 => Self::Transient(resource),
            _ => Self::Settled(resource),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    pub fn into_resource(self) -> Resource {
        match self {
            Self::Settled(resource) | Self::Transient(resource) => resource,
        }
    }
}

/// Probes a URL once, following redirects manually
///
/// # Arguments
///
/// * `client` - Shared HTTP client (must not follow redirects itself)
/// * `url` - The URL to probe
/// * `user_agent` - User agent sent with every request of this probe
/// * `max_redirects` - Hops allowed before giving up with status `-1`
///
/// # Returns
///
/// The classified [`Attempt`]. Transport failures and bad redirect targets are
/// recorded on the resource and always settle the attempt.
pub async fn probe(client: &Client, url: &str, user_agent: &str, max_redirects: u32) -> Attempt {
    let mut resource = Resource::new(url);

    let mut current = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            resource.error = Some(ProbeError::Transport(format!("invalid URL: {}", e)));
            return Attempt::Settled(resource);
        }
    };

    let mut response = match send_head(client, &current, user_agent).await {
        Ok(response) => response,
        Err(e) => {
            resource.error = Some(e);
            return Attempt::Settled(resource);
        }
    };

    while is_followed_redirect(response.status()) {
        resource.redirects_followed += 1;

        if resource.redirects_followed > max_redirects {
            tracing::debug!("{}: more than {} redirects", url, max_redirects);
            resource.status = Some(Status::RedirectLimit);
            resource.error = Some(ProbeError::MaxRedirects);
            return Attempt::Settled(resource);
        }

        current = match next_location(&current, response.headers().get(LOCATION)) {
            Ok(next) => next,
            Err(e) => {
                resource.error = Some(e);
                return Attempt::Settled(resource);
            }
        };

        tracing::debug!(
            "{}: redirect #{} -> {}",
            url,
            resource.redirects_followed,
            current
        );

        response = match send_head(client, &current, user_agent).await {
            Ok(response) => response,
            Err(e) => {
                resource.error = Some(e);
                return Attempt::Settled(resource);
            }
        };
    }

    if resource.redirects_followed > 0 {
        resource.final_url = Some(current.to_string());
    }

    resource.status = Some(Status::Http(response.status().as_u16()));

    if has_bot_header(&response) {
        resource.error = Some(ProbeError::BotHeader);
    }

    Attempt::classify(resource)
}

/// Only 301 and 302 are followed; other 3xx codes are reported as-is
fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(status, StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND)
}

async fn send_head(client: &Client, url: &Url, user_agent: &str) -> Result<Response, ProbeError> {
    client
        .head(url.clone())
        .header(USER_AGENT, user_agent)
        .send()
        .await
        .map_err(|e| ProbeError::Transport(describe_transport_error(&e)))
}

/// Resolves the next hop from a `Location` header
fn next_location(current: &Url, location: Option<&HeaderValue>) -> Result<Url, ProbeError> {
    let location = location.ok_or(ProbeError::MissingLocation)?;

    let location = location
        .to_str()
        .map_err(|e| ProbeError::MalformedLocation {
            location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
            reason: e.to_string(),
        })?;

    resolve_redirect(current, location).map_err(|e| ProbeError::MalformedLocation {
        location: location.to_string(),
        reason: e.to_string(),
    })
}

fn has_bot_header(response: &Response) -> bool {
    response
        .headers()
        .get(BOT_HEADER)
        .map_or(false, |value| !value.is_empty())
}

/// Flattens a reqwest error and its sources into one line
///
/// reqwest's own message only names the request; the underlying cause (DNS,
/// refused connection, certificate) sits further down the source chain.
fn describe_transport_error(error: &reqwest::Error) -> String {
    let mut description = if error.is_timeout() {
        format!("request timed out: {}", error)
    } else {
        error.to_string()
    };

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }

    description
}
