//! Site URL Checker main entry point
//!
//! This is the command-line interface for the bulk URL status checker.

use anyhow::Context;
use clap::Parser;
use site_url_checker::config::{load_config, validate, Config};
use site_url_checker::output::CsvSink;
use site_url_checker::pipeline::{spawn_signal_watcher, Pipeline, RunSummary};
use site_url_checker::requester::{build_http_client, random_user_agent, Requester};
use site_url_checker::robots::load_policy;
use site_url_checker::url::IgnoreRules;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site URL Checker: bulk HTTP status checks for a list of URLs
///
/// Every URL is probed with HEAD requests, redirects are followed by hand,
/// rate-limited answers are retried with backoff, and one CSV row is
/// written per URL.
#[derive(Parser, Debug)]
#[command(name = "site-url-checker")]
#[command(version = "1.0.0")]
#[command(about = "Bulk HTTP status checker for URL lists", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to file with URLs to check, one per line
    #[arg(long, value_name = "FILE")]
    urls: Option<PathBuf>,

    /// Path to output CSV file. If the file exists, its content is overwritten
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of parallel workers making requests
    #[arg(short = 'n', long)]
    workers: Option<usize>,

    /// User agent string sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Send a random user agent with every attempt, ignoring --user-agent
    #[arg(long)]
    random_user_agent: bool,

    /// robots.txt to evaluate URLs against: an http(s) URL or a local path
    #[arg(long, value_name = "URL_OR_FILE")]
    robots: Option<String>,

    /// Agent name the robots.txt rules are evaluated for
    #[arg(long)]
    robots_agent: Option<String>,

    /// File with regular expressions (one per line) of URLs to skip
    #[arg(long, value_name = "FILE")]
    ignore: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    tracing::info!("Starting at {}", chrono::Local::now().to_rfc2822());

    match run(config).await {
        Ok(summary) => {
            report(&summary);
            tracing::info!("Finished at {}", chrono::Local::now().to_rfc2822());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {:#}", e);
            Err(e)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_url_checker=info,warn"),
            1 => EnvFilter::new("site_url_checker=debug,info"),
            2 => EnvFilter::new("site_url_checker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the optional config file and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("cannot load config file {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(urls) = &cli.urls {
        config.input.urls_path = urls.clone();
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.clone();
    }
    if let Some(workers) = cli.workers {
        config.checker.workers = workers;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent.value = user_agent.clone();
    }
    if cli.random_user_agent {
        config.user_agent.random = true;
    }
    if let Some(robots) = &cli.robots {
        config.robots.source = Some(robots.clone());
    }
    if let Some(agent) = &cli.robots_agent {
        config.robots.agent = agent.clone();
    }
    if let Some(ignore) = &cli.ignore {
        config.input.ignore_path = Some(ignore.clone());
    }

    validate(&config)?;
    Ok(config)
}

/// Acquires every input, then runs the pipeline to completion or interrupt
async fn run(config: Config) -> anyhow::Result<RunSummary> {
    let client = build_http_client(&config.checker).context("cannot build HTTP client")?;

    let robots = match &config.robots.source {
        Some(source) => {
            let fetch_agent = if config.user_agent.random {
                random_user_agent()
            } else {
                config.user_agent.value.as_str()
            };
            let policy = load_policy(&client, source, &config.robots.agent, fetch_agent)
                .await
                .with_context(|| format!("cannot load robots.txt from {}", source))?;
            Some(policy)
        }
        None => None,
    };

    let ignore = match &config.input.ignore_path {
        Some(path) => Some(
            IgnoreRules::load(path)
                .with_context(|| format!("cannot load ignore rules from {}", path.display()))?,
        ),
        None => None,
    };

    let urls_path = &config.input.urls_path;
    let source = tokio::fs::File::open(urls_path)
        .await
        .with_context(|| format!("cannot open URL list {}", urls_path.display()))?;

    let csv_path = &config.output.csv_path;
    let sink = CsvSink::create(csv_path)
        .with_context(|| format!("cannot create output file {}", csv_path.display()))?;

    let requester = Requester::new(client, &config, robots);
    let mut pipeline = Pipeline::new(requester, config.checker.workers);
    if let Some(rules) = ignore {
        pipeline = pipeline.with_ignore_rules(rules);
    }

    tracing::info!(
        "Checking URLs from {} into {}",
        urls_path.display(),
        csv_path.display()
    );

    let shutdown = CancellationToken::new();
    let watcher = spawn_signal_watcher(shutdown.clone());

    let outcome = pipeline
        .run(BufReader::new(source), sink, shutdown.clone())
        .await?;

    // Stops the watcher if no signal arrived
    shutdown.cancel();
    let _ = watcher.await;

    let mut file = outcome.sink.into_inner()?;
    file.flush()
        .with_context(|| format!("cannot flush output file {}", csv_path.display()))?;

    Ok(outcome.summary)
}

fn report(summary: &RunSummary) {
    if summary.interrupted {
        tracing::warn!(
            "Interrupted after {:?}: {} of {} dispatched URL(s) written",
            summary.elapsed,
            summary.written,
            summary.dispatched
        );
    } else {
        tracing::info!(
            "Checked {} URL(s) in {:?} ({} ignored)",
            summary.written,
            summary.elapsed,
            summary.ignored
        );
    }

    if summary.write_failures > 0 {
        tracing::error!("{} row(s) could not be written", summary.write_failures);
    }
}
