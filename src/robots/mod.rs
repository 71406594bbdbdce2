//! Robots.txt handling module
//!
//! This module loads a single robots.txt document before the run and evaluates
//! probed URLs against it. The verdict is metadata only: it never blocks a probe.

mod parser;
mod source;

pub use parser::RobotsPolicy;
pub use source::load_policy;

use crate::state::RobotsStatus;

/// Evaluates a URL against an optional policy
///
/// # Arguments
///
/// * `robots` - The configured policy, if any
/// * `url` - The URL to check
///
/// # Returns
///
/// * `Some(RobotsStatus)` - The verdict, when a policy is configured
/// * `None` - No policy is configured, so nothing is recorded
pub fn evaluate(robots: Option<&RobotsPolicy>, url: &str) -> Option<RobotsStatus> {
    robots.map(|policy| policy.evaluate(url))
}
