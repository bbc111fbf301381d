use crate::state::PageStore;
use serde::Serialize;
use std::collections::HashMap;

/// One page in an evaluation submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationEntry {
    pub page_id: String,
    pub latest_node_id: String,
    pub score: f64,
}

/// Body of `POST /evaluate`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationPayload {
    pub entries: Vec<EvaluationEntry>,
}

impl EvaluationPayload {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the submission for the current store and scores
///
/// There is exactly one entry per page record. Pages missing from `scores`
/// are submitted with a score of zero; scored nodes without a record (link
/// targets never fetched) are not submitted.
pub fn build_payload(store: &PageStore, scores: &HashMap<String, f64>) -> EvaluationPayload {
    let entries = store
        .records()
        .map(|record| EvaluationEntry {
            page_id: record.id.clone(),
            latest_node_id: record.version.clone(),
            score: scores.get(&record.id).copied().unwrap_or(0.0),
        })
        .collect();

    EvaluationPayload { entries }
}
