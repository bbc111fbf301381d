//! Statistics collected over one run
//!
//! The coordinator fills a `RunStatistics` as it goes; the binary prints it
//! once the run has ended.

use crate::evaluate::EvaluationFeedback;
use crate::output::FreshnessReport;
use std::time::Duration;

/// Why the main loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The local evaluation window elapsed
    Deadline,

    /// The server reported that the evaluation window has closed
    WindowClosed { message: String },
}

/// Summary of one run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    /// Pages recorded during discovery
    pub pages_discovered: usize,

    /// Pages that could not be fetched during discovery
    pub discovery_failures: usize,

    /// Main-loop cycles started
    pub cycles: u32,

    /// Revisits issued across all cycles
    pub revisits: usize,

    /// Submissions the server scored
    pub submissions_accepted: u32,

    /// Submissions that were rejected or never answered
    pub submissions_failed: u32,

    /// Page requests issued over the whole run
    pub requests_sent: u64,

    /// Why the run ended
    pub stop_reason: StopReason,

    /// Metrics from the last accepted submission
    pub last_feedback: Option<EvaluationFeedback>,

    /// Wall-clock time from start to finish
    pub elapsed: Duration,

    /// Alternation quality of visits against updates
    pub freshness: FreshnessReport,
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Run Statistics ===\n");

    println!("Discovery:");
    println!("  Pages discovered: {}", stats.pages_discovered);
    println!("  Pages skipped: {}", stats.discovery_failures);
    println!();

    println!("Main Loop:");
    println!("  Cycles: {}", stats.cycles);
    println!("  Revisits: {}", stats.revisits);
    println!(
        "  Submissions: {} accepted, {} failed",
        stats.submissions_accepted, stats.submissions_failed
    );
    println!("  Total page requests: {}", stats.requests_sent);
    println!();

    if let Some(feedback) = &stats.last_feedback {
        println!("Last Evaluation:");
        for (name, value) in &feedback.metrics {
            println!("  {}: {:.4}", name, value);
        }
        println!();
    }

    match &stats.stop_reason {
        StopReason::Deadline => println!(
            "Stopped: evaluation window elapsed after {:.1}s",
            stats.elapsed.as_secs_f64()
        ),
        StopReason::WindowClosed { message } => println!(
            "Stopped: server closed the window after {:.1}s ({})",
            stats.elapsed.as_secs_f64(),
            message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_statistics_creation() {
        let stats = RunStatistics {
            pages_discovered: 12,
            discovery_failures: 1,
            cycles: 4,
            revisits: 30,
            submissions_accepted: 3,
            submissions_failed: 1,
            requests_sent: 43,
            stop_reason: StopReason::Deadline,
            last_feedback: None,
            elapsed: Duration::from_secs(60),
            freshness: FreshnessReport::default(),
        };

        assert_eq!(stats.pages_discovered, 12);
        assert_eq!(stats.submissions_accepted + stats.submissions_failed, 4);
        assert_eq!(stats.stop_reason, StopReason::Deadline);
    }
}
