//! Configuration module for Freshrank
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so an empty file (or no file at all) yields a
//! configuration pointing at a local page server.
//!
//! # Example
//!
//! ```no_run
//! use freshrank::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("freshrank.toml")).unwrap();
//! println!("Submitting every {}s", config.timing.submission_interval_seconds);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, RankingConfig, ServerConfig, TimingConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
