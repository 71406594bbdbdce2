//! Requester module: everything that touches the network for one URL
//!
//! This module contains:
//! - HTTP client construction (redirects disabled)
//! - The redirect-following probe
//! - The backoff schedule and retry envelope
//! - User agent selection

mod client;
mod probe;
mod retry;
mod user_agent;

pub use client::build_http_client;
pub use probe::{probe, Attempt, BOT_HEADER};
pub use retry::{retry_transient, BackoffSchedule};
pub use user_agent::{random_user_agent, UserAgentSource, USER_AGENTS};

use crate::config::Config;
use crate::robots::{self, RobotsPolicy};
use crate::state::Resource;
use reqwest::Client;

/// Checks single URLs: retry envelope around the probe, then robots evaluation
///
/// A requester is built once and shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct Requester {
    client: Client,
    user_agent: UserAgentSource,
    backoff: BackoffSchedule,
    max_redirects: u32,
    robots: Option<RobotsPolicy>,
}

impl Requester {
    /// Creates a requester from its parts
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client built with [`build_http_client`]
    /// * `config` - Provides user agent, retry, and redirect settings
    /// * `robots` - Optional robots.txt policy, already loaded
    pub fn new(client: Client, config: &Config, robots: Option<RobotsPolicy>) -> Self {
        Self {
            client,
            user_agent: UserAgentSource::from_config(&config.user_agent),
            backoff: BackoffSchedule::from_config(&config.retry),
            max_redirects: config.checker.max_redirects,
            robots,
        }
    }

    /// Produces the final resource for one URL
    ///
    /// Every retry is a fresh probe with a freshly picked user agent. The
    /// robots verdict is attached only when an attempt settles; a URL that is
    /// still rate limited when the budget runs out keeps an empty verdict.
    pub async fn check(&self, url: &str) -> Resource {
        let (mut resource, settled) = retry_transient(&self.backoff, || {
            let user_agent = self.user_agent.pick();
            async move { probe(&self.client, url, &user_agent, self.max_redirects).await }
        })
        .await;

        if settled {
            resource.robots_status = robots::evaluate(self.robots.as_ref(), &resource.url);
        }

        resource
    }
}
