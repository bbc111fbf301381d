/// Page records and the store that owns them
///
/// A `PageRecord` exists for every page that has been fetched successfully at
/// least once. Records are updated in place on refetch and never removed.
use crate::state::{merge_timestamps, sort_timestamps, Timestamp};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Structured record extracted from one fetched document
#[derive(Debug, Clone, PartialEq)]
pub struct PageDocument {
    /// Page identifier reported by the document
    pub page_id: String,

    /// Current content-version token
    pub version: String,

    /// Outgoing links, normalized to page paths
    pub outgoing: Vec<String>,

    /// Server-reported update times, ascending
    pub update_history: Vec<Timestamp>,
}

/// Everything known about one discovered page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// Stable page identifier (the store key)
    pub id: String,

    /// Request path the page is fetched from
    pub path: String,

    /// Latest content-version token
    pub version: String,

    /// Outgoing links (duplicates allowed)
    pub outgoing: Vec<String>,

    /// Ascending update times; only ever grows
    pub update_history: Vec<Timestamp>,
}

impl PageRecord {
    fn from_document(path: &str, doc: PageDocument) -> Self {
        let mut update_history = doc.update_history;
        sort_timestamps(&mut update_history);

        Self {
            id: doc.page_id,
            path: path.to_string(),
            version: doc.version,
            outgoing: doc.outgoing,
            update_history,
        }
    }

    /// Applies a fresh fetch of this page
    ///
    /// The version and links are replaced; the update history is merged so
    /// previously observed updates are never lost.
    fn apply(&mut self, path: &str, doc: PageDocument) {
        self.path = path.to_string();
        self.version = doc.version;
        self.outgoing = doc.outgoing;
        merge_timestamps(&mut self.update_history, doc.update_history);
    }

    /// Most recent known content change, if any
    pub fn last_known_update(&self) -> Option<Timestamp> {
        self.update_history.last().copied()
    }
}

/// Read-only `{id -> outgoing}` copy of the store used as scorer input
pub type GraphSnapshot = BTreeMap<String, Vec<String>>;

/// Store of all discovered pages, keyed by page id
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    records: BTreeMap<String, PageRecord>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or updates the record for the fetched document
    ///
    /// Returns the record as it stands after the write.
    pub fn upsert(&mut self, path: &str, doc: PageDocument) -> &PageRecord {
        match self.records.entry(doc.page_id.clone()) {
            Entry::Occupied(entry) => {
                let record = entry.into_mut();
                record.apply(path, doc);
                record
            }
            Entry::Vacant(entry) => entry.insert(PageRecord::from_document(path, doc)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&PageRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Iterates over all records in id order
    pub fn records(&self) -> impl Iterator<Item = &PageRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copies the current link structure for scoring
    pub fn graph_snapshot(&self) -> GraphSnapshot {
        self.records
            .values()
            .map(|record| (record.id.clone(), record.outgoing.clone()))
            .collect()
    }
}
