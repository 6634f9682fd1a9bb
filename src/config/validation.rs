use crate::config::types::{Config, LimitsConfig, RetryConfig, SiteConfig, WorkerConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_limits_config(&config.limits)?;
    validate_worker_config(&config.workers)?;
    validate_retry_config(&config.retry)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // The template must itself be a fetchable HTTP(S) URL prefix; appending
    // a page number must not change the scheme or host
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url must use the http or https scheme, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

/// Validates crawl size limits
fn validate_limits_config(config: &LimitsConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.novel_sample_size < 1 {
        return Err(ConfigError::Validation(format!(
            "novel_sample_size must be >= 1, got {}",
            config.novel_sample_size
        )));
    }

    if config.max_chapters_per_novel < 1 {
        return Err(ConfigError::Validation(format!(
            "max_chapters_per_novel must be >= 1, got {}",
            config.max_chapters_per_novel
        )));
    }

    if config.content_cap_bytes < 1 {
        return Err(ConfigError::Validation(format!(
            "content_cap_bytes must be >= 1, got {}",
            config.content_cap_bytes
        )));
    }

    Ok(())
}

/// Validates worker pool sizes
fn validate_worker_config(config: &WorkerConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("workers.pages", config.pages),
        ("workers.novels", config.novels),
        ("workers.chapters", config.chapters),
    ] {
        if value < 1 || value > 100 {
            return Err(ConfigError::Validation(format!(
                "{} must be between 1 and 100, got {}",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates the retry policy
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates the output configuration
fn validate_output_config(config: &crate::config::types::OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
