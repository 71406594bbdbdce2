//! Configuration module for the checker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional, so a run without any file uses [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use site_url_checker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("checker.toml")).unwrap();
//! println!("Checking with {} workers", config.checker.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CheckerConfig, Config, InputConfig, OutputConfig, RetryConfig, RobotsConfig,
    UserAgentConfig, DEFAULT_ROBOTS_AGENT, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
