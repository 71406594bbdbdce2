use crate::config::CheckerConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Builds the HTTP client shared by every worker
///
/// Redirects are never followed by the client itself: the probe inspects every
/// 3xx response and decides how to continue. The user agent is set per request,
/// since it may change between attempts.
///
/// # Arguments
///
/// * `config` - The checker configuration (request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_url_checker::config::CheckerConfig;
/// use site_url_checker::requester::build_http_client;
///
/// let client = build_http_client(&CheckerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CheckerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10).min(config.request_timeout()))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}
