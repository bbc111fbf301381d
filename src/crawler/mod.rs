//! Crawler module for page fetching and run orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and page record extraction
//! - Breadth-first discovery of the page graph
//! - The shared crawl context (records, frontier, visit log)
//! - The main loop that revisits, scores, and submits

mod context;
mod coordinator;
mod discovery;
mod fetcher;
mod frontier;
mod parser;

pub use context::CrawlContext;
pub use coordinator::Coordinator;
pub use discovery::{discover, DiscoveryOptions, DiscoveryStats};
pub use fetcher::{build_http_client, page_url, FetchResult, HttpFetcher, PageSource};
pub use frontier::Frontier;
pub use parser::{normalize_path, parse_page, ExtractError};

use crate::config::Config;
use crate::output::RunStatistics;
use crate::FreshrankError;

/// Runs a complete crawl against the configured page server
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client and evaluator
/// 2. Discover the page graph from the root path
/// 3. Revisit, score, and submit until the window closes
/// 4. Return the run statistics
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(RunStatistics)` - The run finished normally
/// * `Err(FreshrankError)` - Setup failed or nothing could be discovered
pub async fn crawl(config: Config) -> Result<RunStatistics, FreshrankError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
