//! Breadth-first discovery of the page graph
//!
//! Discovery starts from a single root path and walks outgoing links until
//! the frontier is empty. Fetches run concurrently in bounded batches; their
//! results are applied to the crawl context one at a time, in the order they
//! complete, so no path is ever queued twice.

use crate::crawler::context::CrawlContext;
use crate::crawler::fetcher::PageSource;
use crate::crawler::parser::normalize_path;
use crate::state;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Limits applied while walking the graph
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Maximum number of fetches in flight
    pub max_concurrent: usize,

    /// Pause between two batches of fetches
    pub politeness_delay: Duration,

    /// Stop starting new fetches after this instant
    pub deadline: Option<Instant>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            politeness_delay: Duration::ZERO,
            deadline: None,
        }
    }
}

/// Counters describing one discovery phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    /// Pages fetched and recorded
    pub fetched: usize,

    /// Pages skipped after a failed fetch
    pub failed: usize,

    /// Whether the deadline cut discovery short
    pub deadline_reached: bool,
}

/// Discovers the page graph reachable from `root_path`
///
/// Every successfully fetched page gets a record in `ctx.store` and a visit
/// in `ctx.visits`. Pages that fail to fetch are skipped for the rest of
/// the phase.
pub async fn discover<S: PageSource>(
    ctx: &mut CrawlContext,
    source: &Arc<S>,
    root_path: &str,
    options: &DiscoveryOptions,
) -> DiscoveryStats {
    let mut stats = DiscoveryStats::default();
    let max_concurrent = options.max_concurrent.max(1);

    let root = normalize_path(root_path);
    tracing::info!("Starting discovery from '/{}'", root);
    ctx.frontier.push(&root);

    loop {
        if options.deadline.is_some_and(|d| Instant::now() >= d) {
            tracing::warn!(
                "Deadline reached during discovery with {} pages still queued",
                ctx.frontier.len()
            );
            stats.deadline_reached = true;
            break;
        }

        let batch = next_batch(ctx, max_concurrent);
        if batch.is_empty() {
            break;
        }

        let mut tasks = JoinSet::new();
        for path in batch {
            let source = Arc::clone(source);
            tasks.spawn(async move {
                let result = source.fetch(&path).await;
                (path, result, state::now())
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (path, result, fetched_at) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::error!("Fetch task failed: {}", e);
                    stats.failed += 1;
                    continue;
                }
            };

            match ctx.apply_fetch(&path, result) {
                Some(id) => {
                    ctx.visits.record(&id, fetched_at);
                    let queued = ctx.enqueue_links(&id);
                    tracing::debug!("Discovered {} ({} new links queued)", id, queued);
                    stats.fetched += 1;
                }
                None => stats.failed += 1,
            }
        }

        if !options.politeness_delay.is_zero() && !ctx.frontier.is_empty() {
            tokio::time::sleep(options.politeness_delay).await;
        }
    }

    tracing::info!(
        "Discovery finished: {} pages recorded, {} failed",
        stats.fetched,
        stats.failed
    );

    stats
}

/// Pops up to `size` paths that still need a first fetch
fn next_batch(ctx: &mut CrawlContext, size: usize) -> Vec<String> {
    let mut batch = Vec::with_capacity(size);
    while batch.len() < size {
        let Some(path) = ctx.frontier.pop() else {
            break;
        };
        if ctx.store.contains(&path) {
            continue;
        }
        batch.push(path);
    }
    batch
}
