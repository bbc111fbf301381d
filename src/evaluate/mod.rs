//! Evaluation submission
//!
//! Each cycle the crawler packages one `{page_id, latest_node_id, score}`
//! entry per known page and posts the batch to the evaluation endpoint. The
//! server's answer is interpreted as one of:
//! - accepted, with quality metrics that are only logged
//! - window closed, which ends the run normally
//! - any other failure, which is logged and retried next cycle

mod payload;
mod submitter;

pub use payload::{build_payload, EvaluationEntry, EvaluationPayload};
pub use submitter::{
    classify_response, is_window_closed, EvaluationFeedback, Evaluator, HttpEvaluator,
    SubmitOutcome,
};
