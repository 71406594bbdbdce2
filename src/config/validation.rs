use crate::config::types::{
    CheckerConfig, Config, InputConfig, OutputConfig, RetryConfig, RobotsConfig, UserAgentConfig,
};
use crate::ConfigError;

/// Upper bound on the worker pool size
const MAX_WORKERS: usize = 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_checker_config(&config.checker)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_retry_config(&config.retry)?;
    validate_robots_config(&config.robots)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates worker pool configuration
fn validate_checker_config(config: &CheckerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be > 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if !config.random && config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty unless random user agents are enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates the backoff envelope
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if !(config.multiplier.is_finite() && config.multiplier > 0.0) {
        return Err(ConfigError::Validation(format!(
            "retry multiplier must be a positive number, got {}",
            config.multiplier
        )));
    }

    if !(0.0..=1.0).contains(&config.randomization_factor) {
        return Err(ConfigError::Validation(format!(
            "randomization_factor must be within [0, 1], got {}",
            config.randomization_factor
        )));
    }

    if config.max_elapsed_ms == 0 {
        return Err(ConfigError::Validation(
            "max_elapsed_ms must be > 0".to_string(),
        ));
    }

    if config.max_interval_ms == 0 {
        return Err(ConfigError::Validation(
            "max_interval_ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_robots_config(config: &RobotsConfig) -> Result<(), ConfigError> {
    if let Some(source) = &config.source {
        if source.trim().is_empty() {
            return Err(ConfigError::Validation(
                "robots source cannot be empty when set".to_string(),
            ));
        }

        if config.agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "robots agent cannot be empty when a robots source is set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.urls_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "urls_path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.ignore_path, Some(path) if path.as_os_str().is_empty()) {
        return Err(ConfigError::Validation(
            "ignore_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
