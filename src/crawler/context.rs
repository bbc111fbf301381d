use crate::crawler::fetcher::FetchResult;
use crate::crawler::frontier::Frontier;
use crate::state::{PageStore, VisitLog};

/// Mutable crawl state shared by discovery, revisiting, and submission
///
/// The coordinator owns the single instance and hands out `&mut` access to
/// one duty at a time, so every mutation is serialized. Readers that need a
/// stable view (the scorer, the submitter) copy what they need first.
#[derive(Debug, Default)]
pub struct CrawlContext {
    /// Every page fetched successfully at least once
    pub store: PageStore,

    /// Pages waiting for their first fetch
    pub frontier: Frontier,

    /// When this crawler fetched each page
    pub visits: VisitLog,

    /// Total number of requests issued for pages
    pub requests_sent: u64,
}

impl CrawlContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the outcome of fetching `path`
    ///
    /// On success the page record is created or updated and its id returned.
    /// Soft failures are logged and leave any existing record untouched.
    pub fn apply_fetch(&mut self, path: &str, result: FetchResult) -> Option<String> {
        self.requests_sent += 1;

        match result {
            FetchResult::Success(doc) => {
                if doc.page_id != path && !path.is_empty() {
                    tracing::debug!("Path '{}' reports page id '{}'", path, doc.page_id);
                }
                let id = self.store.upsert(path, doc).id.clone();
                self.frontier.mark_seen(&id);
                Some(id)
            }
            FetchResult::BadStatus { status_code } => {
                tracing::warn!("Fetching '{}' returned HTTP {}", path, status_code);
                None
            }
            FetchResult::TransportFailure { error } => {
                tracing::warn!("Fetching '{}' failed: {}", path, error);
                None
            }
            FetchResult::ExtractionFailure { error } => {
                tracing::warn!("Could not extract page record from '{}': {}", path, error);
                None
            }
        }
    }

    /// Queues every outgoing link of `id` that is neither a record nor already seen
    ///
    /// Returns the number of newly queued paths.
    pub fn enqueue_links(&mut self, id: &str) -> usize {
        let Self {
            store, frontier, ..
        } = self;

        let Some(record) = store.get(id) else {
            return 0;
        };

        record
            .outgoing
            .iter()
            .filter(|link| !store.contains(link.as_str()))
            .filter(|link| frontier.push(link))
            .count()
    }
}
