use crate::schedule::predict_next_update;
use crate::state::{PageStore, Timestamp, VisitLog};

/// Why a page was selected for a revisit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisitReason {
    /// Too little history to predict; the fallback interval has elapsed
    FallbackElapsed,

    /// Our last visit predates the last known content change
    Stale,

    /// We were current, but the predicted next update time has passed
    PredictedUpdate,
}

/// Decides whether one page should be fetched again
///
/// # Arguments
///
/// * `history` - Ascending update times known for the page
/// * `last_visit` - Our most recent visit (`None` is treated as the epoch)
/// * `now` - Current time
/// * `fallback` - Minimum seconds between visits when no pattern is known
///
/// # Returns
///
/// * `Some(reason)` - The page should be revisited now
/// * `None` - The page is believed unchanged since our last visit
pub fn should_revisit(
    history: &[Timestamp],
    last_visit: Option<Timestamp>,
    now: Timestamp,
    fallback: f64,
) -> Option<RevisitReason> {
    let last_visit = last_visit.unwrap_or(0.0);

    let (Some(last_known_update), Some(predicted)) =
        (history.last().copied(), predict_next_update(history))
    else {
        return (now - last_visit > fallback).then_some(RevisitReason::FallbackElapsed);
    };

    if last_visit <= last_known_update {
        Some(RevisitReason::Stale)
    } else if now > predicted {
        Some(RevisitReason::PredictedUpdate)
    } else {
        None
    }
}

/// Selects the pages worth re-fetching this cycle
///
/// Pages are returned in store order, each at most once. Only existing
/// records are considered; this never discovers new pages.
pub fn select_pages_to_revisit(
    store: &PageStore,
    visits: &VisitLog,
    now: Timestamp,
    fallback: f64,
) -> Vec<String> {
    store
        .records()
        .filter_map(|record| {
            let reason = should_revisit(
                &record.update_history,
                visits.last_visit(&record.id),
                now,
                fallback,
            )?;
            tracing::trace!("Revisit {} ({:?})", record.id, reason);
            Some(record.id.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PageDocument;

    const FALLBACK: f64 = 45.0;

    fn store_with(pages: &[(&str, &[f64])]) -> PageStore {
        let mut store = PageStore::new();
        for (id, history) in pages {
            store.upsert(
                id,
                PageDocument {
                    page_id: id.to_string(),
                    version: "v".to_string(),
                    outgoing: vec![],
                    update_history: history.to_vec(),
                },
            );
        }
        store
    }

    #[test]
    fn test_stale_page_revisited_immediately() {
        // predicted 190, but last visit 100 <= last known update 160
        let reason = should_revisit(&[100.0, 130.0, 160.0], Some(100.0), 165.0, FALLBACK);
        assert_eq!(reason, Some(RevisitReason::Stale));
    }

    #[test]
    fn test_current_page_waits_for_prediction() {
        let history = [0.0, 10.0];

        assert_eq!(should_revisit(&history, Some(10.0), 15.0, FALLBACK), Some(RevisitReason::Stale));
        assert_eq!(should_revisit(&history, Some(12.0), 15.0, FALLBACK), None);
        assert_eq!(should_revisit(&history, Some(12.0), 20.0, FALLBACK), None);
        assert_eq!(
            should_revisit(&history, Some(12.0), 20.5, FALLBACK),
            Some(RevisitReason::PredictedUpdate)
        );
    }

    #[test]
    fn test_two_point_history_visited_at_last_update() {
        // history [t0, t1], last visit slightly after t1: wait until t1 + (t1 - t0)
        let history = [100.0, 120.0];
        assert_eq!(should_revisit(&history, Some(120.5), 139.0, FALLBACK), None);
        assert_eq!(should_revisit(&history, Some(120.5), 140.0, FALLBACK), None);
        assert!(should_revisit(&history, Some(120.5), 140.1, FALLBACK).is_some());
    }

    #[test]
    fn test_visit_at_last_update_counts_as_stale() {
        // a visit in the same second as the last update may have missed it
        let history = [100.0, 120.0];
        assert_eq!(
            should_revisit(&history, Some(120.0), 121.0, FALLBACK),
            Some(RevisitReason::Stale)
        );
        assert_eq!(should_revisit(&history, Some(120.0 + 1e-3), 121.0, FALLBACK), None);
    }

    #[test]
    fn test_short_history_uses_fallback() {
        assert_eq!(should_revisit(&[50.0], Some(100.0), 140.0, FALLBACK), None);
        assert_eq!(should_revisit(&[], Some(100.0), 145.0, FALLBACK), None);
        assert_eq!(
            should_revisit(&[], Some(100.0), 145.5, FALLBACK),
            Some(RevisitReason::FallbackElapsed)
        );
    }

    #[test]
    fn test_never_visited_short_history_is_selected() {
        assert_eq!(
            should_revisit(&[], None, 1_000.0, FALLBACK),
            Some(RevisitReason::FallbackElapsed)
        );
    }

    #[test]
    fn test_short_history_at_most_once_per_fallback() {
        let store = store_with(&[("page_a", &[])]);
        let mut visits = VisitLog::new();
        visits.record("page_a", 1_000.0);

        let mut selections = 0;
        let mut now = 1_000.0;
        while now <= 1_000.0 + 3.0 * FALLBACK {
            if !select_pages_to_revisit(&store, &visits, now, FALLBACK).is_empty() {
                selections += 1;
                visits.record("page_a", now);
            }
            now += 1.0;
        }

        // one selection per elapsed fallback window, never more
        assert_eq!(selections, 2);
        let times = visits.visits("page_a");
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] > FALLBACK);
        }
    }

    #[test]
    fn test_select_pages_mixed_store() {
        let store = store_with(&[
            ("page_a", &[100.0, 130.0, 160.0]),
            ("page_b", &[100.0, 130.0, 160.0]),
            ("page_c", &[]),
        ]);
        let mut visits = VisitLog::new();
        visits.record("page_a", 100.0);
        visits.record("page_b", 161.0);
        visits.record("page_c", 150.0);

        let selected = select_pages_to_revisit(&store, &visits, 165.0, FALLBACK);
        assert_eq!(selected, vec!["page_a".to_string()]);

        let selected = select_pages_to_revisit(&store, &visits, 200.0, FALLBACK);
        assert_eq!(
            selected,
            vec!["page_a".to_string(), "page_b".to_string(), "page_c".to_string()]
        );
    }
}
