//! Robots.txt acquisition
//!
//! The document is read once, before the pipeline starts, either over HTTP or
//! from a local file. Any failure here is fatal to the run.

use crate::robots::RobotsPolicy;
use crate::CheckerError;
use reqwest::Client;
use std::path::Path;

/// Returns true if the source names a remote document
fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads a robots.txt policy from a URL or a local path
///
/// # Arguments
///
/// * `client` - HTTP client used for remote sources
/// * `source` - `http(s)://` URL, or a path to a local file
/// * `agent` - Agent name the policy is evaluated for
/// * `user_agent` - User agent sent when fetching a remote source
///
/// # Returns
///
/// * `Ok(RobotsPolicy)` - The loaded document
/// * `Err(CheckerError)` - The document could not be read or fetched
pub async fn load_policy(
    client: &Client,
    source: &str,
    agent: &str,
    user_agent: &str,
) -> Result<RobotsPolicy, CheckerError> {
    let body = if is_remote(source) {
        fetch_body(client, source, user_agent).await?
    } else {
        tokio::fs::read_to_string(Path::new(source)).await?
    };

    tracing::info!(
        "Loaded robots.txt from {} ({} bytes), evaluating for agent '{}'",
        source,
        body.len(),
        agent
    );

    Ok(RobotsPolicy::new(body, agent))
}

async fn fetch_body(client: &Client, url: &str, user_agent: &str) -> Result<String, CheckerError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, user_agent)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(CheckerError::RobotsFetch {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}
