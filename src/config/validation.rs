use crate::config::types::{
    Config, CrawlerConfig, RankingConfig, ServerConfig, TimingConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Longest evaluation window accepted (one day)
pub const MAX_WINDOW_SECONDS: f64 = 86_400.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_timing_config(&config.timing)?;
    validate_crawler_config(&config.crawler)?;
    validate_ranking_config(&config.ranking)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the remote host configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot be used as a base",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates window, cadence, and pacing values
fn validate_timing_config(config: &TimingConfig) -> Result<(), ConfigError> {
    if !(config.window_seconds.is_finite() && config.window_seconds > 0.0) {
        return Err(ConfigError::Validation(format!(
            "window-seconds must be > 0, got {}",
            config.window_seconds
        )));
    }

    if config.window_seconds > MAX_WINDOW_SECONDS {
        return Err(ConfigError::Validation(format!(
            "window-seconds must be <= {}, got {}",
            MAX_WINDOW_SECONDS, config.window_seconds
        )));
    }

    if !(config.submission_interval_seconds.is_finite()
        && config.submission_interval_seconds > 0.0)
    {
        return Err(ConfigError::Validation(format!(
            "submission-interval-seconds must be > 0, got {}",
            config.submission_interval_seconds
        )));
    }

    if config.submission_interval_seconds > config.window_seconds {
        return Err(ConfigError::Validation(format!(
            "submission-interval-seconds ({}) cannot exceed window-seconds ({})",
            config.submission_interval_seconds, config.window_seconds
        )));
    }

    if !(config.fallback_revisit_seconds.is_finite() && config.fallback_revisit_seconds > 0.0) {
        return Err(ConfigError::Validation(format!(
            "fallback-revisit-seconds must be > 0, got {}",
            config.fallback_revisit_seconds
        )));
    }

    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 64 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and 64, got {}",
            config.max_concurrent_fetches
        )));
    }

    Ok(())
}

/// Validates PageRank parameters
fn validate_ranking_config(config: &RankingConfig) -> Result<(), ConfigError> {
    if !(config.damping > 0.0 && config.damping < 1.0) {
        return Err(ConfigError::Validation(format!(
            "damping must be strictly between 0 and 1, got {}",
            config.damping
        )));
    }

    if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
        return Err(ConfigError::Validation(format!(
            "tolerance must be > 0, got {}",
            config.tolerance
        )));
    }

    if config.max_iterations < 1 {
        return Err(ConfigError::Validation(
            "max-iterations must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = ServerConfig::default();
        assert!(validate_server_config(&config).is_ok());

        config.base_url = "not a url".to_string();
        assert!(matches!(
            validate_server_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        config.base_url = "ftp://example.com".to_string();
        assert!(validate_server_config(&config).is_err());
    }

    #[test]
    fn test_validate_timing() {
        let mut config = TimingConfig::default();
        assert!(validate_timing_config(&config).is_ok());

        config.window_seconds = 0.0;
        assert!(validate_timing_config(&config).is_err());

        config = TimingConfig::default();
        config.submission_interval_seconds = 120.0;
        assert!(validate_timing_config(&config).is_err());

        config = TimingConfig::default();
        config.fallback_revisit_seconds = -1.0;
        assert!(validate_timing_config(&config).is_err());

        config = TimingConfig::default();
        config.request_timeout_seconds = 0;
        assert!(validate_timing_config(&config).is_err());
    }

    #[test]
    fn test_validate_window_upper_bound() {
        let mut config = TimingConfig::default();
        config.window_seconds = MAX_WINDOW_SECONDS;
        assert!(validate_timing_config(&config).is_ok());
        assert_eq!(config.window().as_secs(), 86_400);

        config.window_seconds = 1e20;
        config.submission_interval_seconds = 1e20;
        assert!(matches!(
            validate_timing_config(&config),
            Err(ConfigError::Validation(_))
        ));

        config.window_seconds = 1e20;
        config.submission_interval_seconds = 14.5;
        assert!(validate_timing_config(&config).is_err());
    }

    #[test]
    fn test_validate_ranking() {
        let mut config = RankingConfig::default();
        assert!(validate_ranking_config(&config).is_ok());

        config.damping = 1.0;
        assert!(validate_ranking_config(&config).is_err());

        config = RankingConfig::default();
        config.tolerance = 0.0;
        assert!(validate_ranking_config(&config).is_err());

        config = RankingConfig::default();
        config.max_iterations = 0;
        assert!(validate_ranking_config(&config).is_err());
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut config = UserAgentConfig::default();
        assert!(validate_user_agent_config(&config).is_ok());

        config.crawler_name = String::new();
        assert!(validate_user_agent_config(&config).is_err());

        config.crawler_name = "bad name!".to_string();
        assert!(validate_user_agent_config(&config).is_err());
    }
}
