//! Importance scoring over the discovered page graph
//!
//! Scores are a PageRank-style stationary distribution: non-negative and
//! summing to one over every node that appears as either the source or the
//! target of a link.

mod pagerank;

pub use pagerank::score;
