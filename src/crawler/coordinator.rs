//! Crawler coordinator - main run orchestration logic
//!
//! This module contains the main loop that coordinates all aspects of a run:
//! - Discovering the page graph from the root path
//! - Revisiting pages the scheduler believes have changed
//! - Scoring the graph and submitting it once per cycle
//! - Stopping at the local deadline or when the server closes the window
//! - Computing the final freshness report

use crate::config::{validate, Config};
use crate::crawler::context::CrawlContext;
use crate::crawler::discovery::{discover, DiscoveryOptions};
use crate::crawler::fetcher::{HttpFetcher, PageSource};
use crate::evaluate::{build_payload, Evaluator, HttpEvaluator, SubmitOutcome};
use crate::output::{FreshnessReport, RunStatistics, StopReason};
use crate::rank::score;
use crate::schedule::select_pages_to_revisit;
use crate::state;
use crate::FreshrankError;
use std::sync::Arc;
use tokio::time::Instant;

/// Main crawler coordinator structure
///
/// The coordinator is the single owner of the crawl context. Discovery,
/// revisiting, and submission take turns on it, so every cycle's revisits
/// are fully applied before that cycle's snapshot is scored.
pub struct Coordinator<S: PageSource = HttpFetcher, E: Evaluator = HttpEvaluator> {
    config: Config,
    source: Arc<S>,
    evaluator: E,
    context: CrawlContext,
}

impl Coordinator {
    /// Creates a coordinator talking to the configured page server
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(FreshrankError)` - The configuration is invalid, or the HTTP
    ///   client or base URL could not be set up
    pub fn new(config: Config) -> Result<Self, FreshrankError> {
        validate(&config)?;
        let fetcher = HttpFetcher::from_config(&config)?;
        let evaluator = HttpEvaluator::from_config(&config)?;
        tracing::debug!(
            "Fetching pages from {}, submitting to {}",
            fetcher.base_url(),
            evaluator.url()
        );
        Ok(Self::with_parts(config, fetcher, evaluator))
    }
}

impl<S: PageSource, E: Evaluator> Coordinator<S, E> {
    /// Creates a coordinator from an explicit page source and evaluator
    pub fn with_parts(config: Config, source: S, evaluator: E) -> Self {
        Self {
            config,
            source: Arc::new(source),
            evaluator,
            context: CrawlContext::new(),
        }
    }

    /// Read access to the crawl state
    pub fn context(&self) -> &CrawlContext {
        &self.context
    }

    /// Runs discovery and then the main loop until the window closes
    ///
    /// Each cycle:
    /// 1. Selects and refetches pages the scheduler believes have changed
    /// 2. Scores a snapshot of the graph
    /// 3. Submits one entry per page
    /// 4. Sleeps until the next submission slot
    ///
    /// # Returns
    ///
    /// * `Ok(RunStatistics)` - The run ended at the deadline or on the server's signal
    /// * `Err(FreshrankError)` - Nothing could be discovered from the root path
    pub async fn run(&mut self) -> Result<RunStatistics, FreshrankError> {
        let timing = self.config.timing.clone();
        let start = Instant::now();
        let deadline = start + timing.window();

        tracing::info!(
            "Window: {:.1}s | Interval: {:.1}s",
            timing.window_seconds,
            timing.submission_interval_seconds
        );

        let options = DiscoveryOptions {
            max_concurrent: self.config.crawler.max_concurrent_fetches as usize,
            politeness_delay: timing.politeness_delay(),
            deadline: Some(deadline),
        };
        let discovery = discover(
            &mut self.context,
            &self.source,
            &self.config.server.root_path,
            &options,
        )
        .await;

        if self.context.store.is_empty() {
            tracing::error!("Nothing discovered; is the page server running?");
            return Err(FreshrankError::NothingDiscovered {
                root: self.config.server.root_path.clone(),
            });
        }

        let mut stats = RunStatistics {
            pages_discovered: discovery.fetched,
            discovery_failures: discovery.failed,
            cycles: 0,
            revisits: 0,
            submissions_accepted: 0,
            submissions_failed: 0,
            requests_sent: 0,
            stop_reason: StopReason::Deadline,
            last_feedback: None,
            elapsed: start.elapsed(),
            freshness: FreshnessReport::default(),
        };

        while Instant::now() < deadline {
            stats.cycles += 1;
            let cycle = stats.cycles;
            tracing::info!(
                "Cycle {} (t={:.1}s)",
                cycle,
                start.elapsed().as_secs_f64()
            );

            stats.revisits += self.revisit(deadline).await;

            if Instant::now() >= deadline {
                tracing::info!("Deadline reached before submission {}", cycle);
                break;
            }

            match self.submit().await {
                SubmitOutcome::Accepted(feedback) => {
                    tracing::info!("Submission {} accepted: {}", cycle, feedback);
                    stats.submissions_accepted += 1;
                    stats.last_feedback = Some(feedback);
                }
                SubmitOutcome::WindowClosed { message } => {
                    tracing::info!("Server signal: window ended ({})", message);
                    stats.stop_reason = StopReason::WindowClosed { message };
                    break;
                }
                SubmitOutcome::Rejected { status, message } => {
                    tracing::warn!("Submission {} rejected (HTTP {}): {}", cycle, status, message);
                    stats.submissions_failed += 1;
                }
                SubmitOutcome::TransportFailure { error } => {
                    tracing::warn!("Submission {} failed: {}", cycle, error);
                    stats.submissions_failed += 1;
                }
            }

            let next_slot = start + timing.submission_interval() * cycle;
            let wake = next_slot.min(deadline);
            let now = Instant::now();
            if wake > now {
                tracing::debug!("Sleeping {:.2}s", (wake - now).as_secs_f64());
                tokio::time::sleep_until(wake).await;
            }
        }

        stats.requests_sent = self.context.requests_sent;
        stats.elapsed = start.elapsed();
        stats.freshness = FreshnessReport::compute(&self.context.store, &self.context.visits);

        tracing::info!(
            "Run finished: {} visits to {} pages over {} cycles",
            self.context.visits.total_visits(),
            self.context.visits.len(),
            stats.cycles
        );

        if let Some(average) = stats.freshness.average() {
            tracing::info!("Average streak score: {:.4}", average);
        }

        Ok(stats)
    }

    /// Refetches every page the scheduler selects for this cycle
    ///
    /// Every attempt is logged as a visit, successful or not. Returns the
    /// number of attempts made.
    async fn revisit(&mut self, deadline: Instant) -> usize {
        let selected = select_pages_to_revisit(
            &self.context.store,
            &self.context.visits,
            state::now(),
            self.config.timing.fallback_revisit_seconds,
        );

        tracing::info!(
            "Predicting updates... visiting {} / {} pages",
            selected.len(),
            self.context.store.len()
        );

        let delay = self.config.timing.politeness_delay();
        let mut attempted = 0;

        for id in selected {
            if Instant::now() >= deadline {
                tracing::debug!("Deadline reached with revisits pending");
                break;
            }

            let Some(path) = self.context.store.get(&id).map(|r| r.path.clone()) else {
                continue;
            };

            let result = self.source.fetch(&path).await;
            let visited_at = state::now();
            if self.context.apply_fetch(&path, result).is_none() {
                tracing::debug!("Refetch of {} failed; keeping previous record", id);
            }
            self.context.visits.record(&id, visited_at);
            attempted += 1;

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        attempted
    }

    /// Scores the current graph and submits it
    async fn submit(&self) -> SubmitOutcome {
        let snapshot = self.context.store.graph_snapshot();
        let scores = score(&snapshot, &self.config.ranking);
        let payload = build_payload(&self.context.store, &scores);

        tracing::debug!("Submitting {} entries", payload.len());
        self.evaluator.submit(&payload).await
    }
}
