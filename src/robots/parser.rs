//! Robots.txt policy evaluation
//!
//! This module wraps the robotstxt crate's matcher behind a policy that pairs a
//! fetched document with the agent name it is evaluated for.

use crate::state::RobotsStatus;
use robotstxt::DefaultMatcher;

/// An immutable robots.txt document plus the agent it is evaluated for
///
/// A policy is built once before any worker starts and shared read-only.
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    /// Raw robots.txt content
    body: String,
    /// Agent name used for every evaluation
    agent: String,
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `body` - The raw robots.txt file content
    /// * `agent` - The agent name to evaluate rules for
    pub fn new(body: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            agent: agent.into(),
        }
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Checks if a URL may be crawled by the configured agent
    ///
    /// # Arguments
    ///
    /// * `url` - The full URL (or bare path) to check
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str) -> bool {
        // The matcher keeps per-evaluation state, so each call gets its own
        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.body, &self.agent, url)
    }

    /// Evaluates the URL into the status recorded on a result
    pub fn evaluate(&self, url: &str) -> RobotsStatus {
        RobotsStatus::from_allowed(self.is_allowed(url))
    }
}
