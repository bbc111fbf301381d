use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Freshrank
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub timing: TimingConfig,
    pub crawler: CrawlerConfig,
    pub ranking: RankingConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Remote host configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the page server (pages live at `<base-url>/<path>`)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path the discovery traversal starts from
    #[serde(rename = "root-path")]
    pub root_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            root_path: "/".to_string(),
        }
    }
}

/// Timing configuration for the evaluation window and request pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Length of the evaluation window (seconds)
    #[serde(rename = "window-seconds")]
    pub window_seconds: f64,

    /// Period between two submissions (seconds)
    #[serde(rename = "submission-interval-seconds")]
    pub submission_interval_seconds: f64,

    /// Delay between two consecutive requests (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Revisit interval for pages without a usable update history (seconds)
    #[serde(rename = "fallback-revisit-seconds")]
    pub fallback_revisit_seconds: f64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-seconds")]
    pub request_timeout_seconds: u64,
}

impl TimingConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs_f64(self.window_seconds)
    }

    pub fn submission_interval(&self) -> Duration {
        Duration::from_secs_f64(self.submission_interval_seconds)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            window_seconds: 60.0,
            submission_interval_seconds: 14.5,
            politeness_delay_ms: 10,
            fallback_revisit_seconds: 45.0,
            request_timeout_seconds: 10,
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of fetches in flight during discovery
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 4,
        }
    }
}

/// PageRank parameters
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Probability of following an outgoing link
    pub damping: f64,

    /// L1 convergence threshold between two iterations
    pub tolerance: f64,

    /// Iteration cap
    #[serde(rename = "max-iterations")]
    pub max_iterations: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1.0e-6,
            max_iterations: 100,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "freshrank".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
