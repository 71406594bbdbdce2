//! Integration tests for the checker
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! probe, the retry envelope and the full pipeline end-to-end.

mod pipeline_tests;

use site_url_checker::config::{Config, RetryConfig};
use site_url_checker::requester::{build_http_client, Requester};
use site_url_checker::robots::RobotsPolicy;

/// Creates a test configuration with a short retry budget
pub fn create_test_config(workers: usize) -> Config {
    let mut config = Config::default();
    config.checker.workers = workers;
    config.checker.request_timeout_secs = 5;
    config.user_agent.value = "TestAgent/1.0".to_string();
    config.retry = RetryConfig {
        initial_interval_ms: 10,
        multiplier: 0.5,
        max_interval_ms: 1_000,
        max_elapsed_ms: 300,
        randomization_factor: 0.5,
    };
    config
}

/// Builds a requester from a test configuration
pub fn create_requester(config: &Config, robots: Option<RobotsPolicy>) -> Requester {
    let client = build_http_client(&config.checker).expect("Failed to build HTTP client");
    Requester::new(client, config, robots)
}
