//! State module for tracking what the crawler knows
//!
//! # Components
//!
//! - `PageRecord` / `PageStore`: per-page graph edges, version token, and update history
//! - `VisitLog`: when this crawler fetched each page
//! - `Timestamp`: the shared clock representation

mod page_record;
mod visit_log;

// Re-export main types
pub use page_record::{GraphSnapshot, PageDocument, PageRecord, PageStore};
pub use visit_log::VisitLog;

use chrono::Utc;

/// Seconds since the UNIX epoch
///
/// Server-reported update times and local visit times share this clock.
pub type Timestamp = f64;

/// Returns the current wall-clock time as a `Timestamp`
pub fn now() -> Timestamp {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Sorts timestamps ascending, dropping non-finite values
///
/// Equal timestamps are kept: history has one-second resolution, so two
/// updates in the same second share a value.
pub fn sort_timestamps(times: &mut Vec<Timestamp>) {
    times.retain(|t| t.is_finite());
    times.sort_by(|a, b| a.total_cmp(b));
}

/// Merges a freshly observed history into a known one
///
/// Both inputs are sorted first. A timestamp seen in both is kept as many
/// times as it appears in whichever side reports it more often, so
/// re-observing the same updates never duplicates them.
pub fn merge_timestamps(known: &mut Vec<Timestamp>, mut observed: Vec<Timestamp>) {
    sort_timestamps(known);
    sort_timestamps(&mut observed);

    let mut merged = Vec::with_capacity(known.len().max(observed.len()));
    let (mut i, mut j) = (0, 0);
    while i < known.len() && j < observed.len() {
        match known[i].total_cmp(&observed[j]) {
            std::cmp::Ordering::Less => {
                merged.push(known[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(observed[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                merged.push(known[i]);
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&known[i..]);
    merged.extend_from_slice(&observed[j..]);

    *known = merged;
}
