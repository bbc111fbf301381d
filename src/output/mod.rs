//! Run reporting
//!
//! This module provides:
//! - The offline freshness metric and the end-of-run freshness report
//! - Run statistics collected by the coordinator and their console summary

mod freshness;
mod stats;

pub use freshness::{print_freshness_report, streak_score, FreshnessReport, PageFreshness};
pub use stats::{print_statistics, RunStatistics, StopReason};
