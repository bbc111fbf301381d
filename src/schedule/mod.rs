//! Revisit scheduling
//!
//! This module decides which already-discovered pages are worth fetching
//! again. It contains:
//! - The update predictor, which estimates when a page will next change
//! - The adaptive rescheduler, which combines that estimate with the visit log
//!
//! Revisiting a page that has not changed wastes a request and lengthens a
//! run of visits with no update in between, which the freshness metric
//! penalizes quadratically. The policy therefore always catches up on known
//! staleness but throttles speculative polling once caught up.

mod predictor;
mod rescheduler;

pub use predictor::predict_next_update;
pub use rescheduler::{select_pages_to_revisit, should_revisit, RevisitReason};
