//! Freshrank: an adaptive crawl scheduler for dynamically-updating page graphs
//!
//! This crate discovers a graph of pages served by a single host, tracks each
//! page's update history, revisits pages when they are predicted to have
//! changed, and periodically submits a PageRank-ordered snapshot of the graph
//! to an evaluation endpoint until the evaluation window closes.

pub mod config;
pub mod crawler;
pub mod evaluate;
pub mod output;
pub mod rank;
pub mod schedule;
pub mod state;

use thiserror::Error;

/// Main error type for Freshrank operations
#[derive(Debug, Error)]
pub enum FreshrankError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No pages could be discovered from root path '{root}'")]
    NothingDiscovered { root: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Freshrank operations
pub type Result<T> = std::result::Result<T, FreshrankError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlContext};
pub use state::{PageRecord, PageStore, Timestamp, VisitLog};
