//! Offline freshness metric
//!
//! Measures how well the crawler's visits alternated with a page's updates.
//! Updates and visits are merged into one time-ordered sequence and split
//! into streaks of same-type events. The score is the mean of squared streak
//! lengths per event: perfect alternation scores 1.0, and every extra visit
//! without an update in between (or update without a visit) pushes it up.

use crate::state::{PageStore, Timestamp, VisitLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Update,
    Visit,
}

/// Scores the alternation of `update_times` and `visit_times`
///
/// Returns `Σ(streak_len²) / total_events`, or 0.0 when both series are
/// empty. Simultaneous events order updates first.
///
/// # Example
///
/// ```
/// use freshrank::output::streak_score;
///
/// assert_eq!(streak_score(&[1.0, 3.0], &[2.0, 4.0]), 1.0);
/// assert_eq!(streak_score(&[1.0, 2.0], &[3.0, 4.0]), 2.0);
/// ```
pub fn streak_score(update_times: &[Timestamp], visit_times: &[Timestamp]) -> f64 {
    let mut events: Vec<(Timestamp, Event)> = update_times
        .iter()
        .map(|&t| (t, Event::Update))
        .chain(visit_times.iter().map(|&t| (t, Event::Visit)))
        .collect();

    if events.is_empty() {
        return 0.0;
    }

    // stable: ties keep updates ahead of visits
    events.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut sum_of_squares = 0u64;
    let mut current = events[0].1;
    let mut length = 0u64;

    for &(_, kind) in &events {
        if kind == current {
            length += 1;
        } else {
            sum_of_squares += length * length;
            current = kind;
            length = 1;
        }
    }
    sum_of_squares += length * length;

    sum_of_squares as f64 / events.len() as f64
}

/// Freshness score of one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageFreshness {
    pub page_id: String,
    pub score: f64,
    pub updates: usize,
    pub visits: usize,
}

/// Freshness scores for every page at the end of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreshnessReport {
    /// Per-page scores in page id order
    pub pages: Vec<PageFreshness>,
}

impl FreshnessReport {
    /// Scores every page record against its visit log
    pub fn compute(store: &PageStore, visits: &VisitLog) -> Self {
        let pages = store
            .records()
            .map(|record| {
                let visit_times = visits.visits(&record.id);
                PageFreshness {
                    page_id: record.id.clone(),
                    score: streak_score(&record.update_history, visit_times),
                    updates: record.update_history.len(),
                    visits: visit_times.len(),
                }
            })
            .collect();

        Self { pages }
    }

    /// Mean score across pages, `None` if no pages were scored
    pub fn average(&self) -> Option<f64> {
        if self.pages.is_empty() {
            return None;
        }
        Some(self.pages.iter().map(|p| p.score).sum::<f64>() / self.pages.len() as f64)
    }
}

/// Prints the freshness report to stdout
///
/// # Arguments
///
/// * `report` - The report to display
/// * `samples` - How many individual pages to show before the average
pub fn print_freshness_report(report: &FreshnessReport, samples: usize) {
    println!("=== Freshness Report ===\n");

    let Some(average) = report.average() else {
        println!("No pages found to calculate metric.");
        return;
    };

    for page in report.pages.iter().take(samples) {
        println!(
            "  {}: score {:.4} (updates: {}, visits: {})",
            page.page_id, page.score, page.updates, page.visits
        );
    }
    if report.pages.len() > samples {
        println!("  ... and {} more pages", report.pages.len() - samples);
    }
    println!();

    println!(
        "Average streak score: {:.4} over {} pages (target: 1.0)",
        average,
        report.pages.len()
    );
}
