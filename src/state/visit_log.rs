use crate::state::Timestamp;
use std::collections::HashMap;

/// Times at which this crawler fetched each page
///
/// Entries are append-only. A visit is recorded whether or not the fetch
/// succeeded, because the request was spent either way.
#[derive(Debug, Clone, Default)]
pub struct VisitLog {
    visits: HashMap<String, Vec<Timestamp>>,
}

impl VisitLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a visit for `page_id`
    ///
    /// The series stays ascending: a timestamp older than the latest recorded
    /// visit (clock skew) is clamped to that latest visit.
    pub fn record(&mut self, page_id: &str, at: Timestamp) {
        let series = self.visits.entry(page_id.to_string()).or_default();
        let at = match series.last() {
            Some(&last) if at < last => last,
            _ => at,
        };
        series.push(at);
    }

    /// Most recent visit to `page_id`, or `None` if never visited
    pub fn last_visit(&self, page_id: &str) -> Option<Timestamp> {
        self.visits.get(page_id).and_then(|v| v.last().copied())
    }

    /// All visits to `page_id` in ascending order
    pub fn visits(&self, page_id: &str) -> &[Timestamp] {
        self.visits.get(page_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of recorded visits across all pages
    pub fn total_visits(&self) -> usize {
        self.visits.values().map(Vec::len).sum()
    }

    /// Number of distinct pages visited at least once
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}
