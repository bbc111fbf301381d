use crate::config::Config;
use crate::crawler::{build_http_client, page_url};
use crate::evaluate::EvaluationPayload;
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use url::Url;

/// Quality metrics reported by the evaluation endpoint
///
/// Only used for logging; nothing here feeds back into scheduling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationFeedback {
    /// Every top-level numeric field of the response
    pub metrics: BTreeMap<String, f64>,
}

impl EvaluationFeedback {
    pub fn from_json(value: &Value) -> Self {
        let metrics = value
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .filter_map(|(key, value)| value.as_f64().map(|v| (key.clone(), v)))
                    .collect()
            })
            .unwrap_or_default();

        Self { metrics }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

impl fmt::Display for EvaluationFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.metrics.is_empty() {
            return write!(f, "(no metrics)");
        }
        let parts: Vec<String> = self
            .metrics
            .iter()
            .map(|(key, value)| format!("{}={:.4}", key, value))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// How the evaluation endpoint answered one submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Submission scored
    Accepted(EvaluationFeedback),

    /// The evaluation window is over; the run should stop
    WindowClosed { message: String },

    /// The server refused this submission; a later one may succeed
    Rejected { status: u16, message: String },

    /// The request never got an answer
    TransportFailure { error: String },
}

/// Anything that can score a submission
pub trait Evaluator: Send + Sync {
    fn submit(&self, payload: &EvaluationPayload) -> impl Future<Output = SubmitOutcome> + Send;
}

/// Whether an error message means the evaluation window has closed
pub fn is_window_closed(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("ended") || message.contains("too late")
}

/// Interprets a status code and body returned by the evaluation endpoint
///
/// A success status whose JSON body carries an `error` field is still a
/// failure.
pub fn classify_response(status: u16, body: &str) -> SubmitOutcome {
    let json: Option<Value> = serde_json::from_str(body).ok();
    let error = json.as_ref().and_then(error_message);
    let success = (200..300).contains(&status);

    if success && error.is_none() {
        return SubmitOutcome::Accepted(
            json.as_ref()
                .map(EvaluationFeedback::from_json)
                .unwrap_or_default(),
        );
    }

    let message = error.unwrap_or_else(|| body.trim().to_string());
    if is_window_closed(&message) {
        SubmitOutcome::WindowClosed { message }
    } else {
        SubmitOutcome::Rejected { status, message }
    }
}

fn error_message(json: &Value) -> Option<String> {
    let error = json.get("error")?;
    if error.is_null() {
        return None;
    }
    Some(match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Evaluator backed by `POST <base>/evaluate`
#[derive(Debug, Clone)]
pub struct HttpEvaluator {
    client: Client,
    url: Url,
}

impl HttpEvaluator {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Creates an evaluator for the configured server
    pub fn from_config(config: &Config) -> Result<Self, crate::FreshrankError> {
        let client = build_http_client(&config.user_agent, config.timing.request_timeout())?;
        let base = Url::parse(&config.server.base_url)?;
        Ok(Self::new(client, page_url(&base, "evaluate")?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Evaluator for HttpEvaluator {
    async fn submit(&self, payload: &EvaluationPayload) -> SubmitOutcome {
        let response = match self.client.post(self.url.clone()).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                return SubmitOutcome::TransportFailure {
                    error: e.to_string(),
                }
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => classify_response(status, &body),
            Err(e) => SubmitOutcome::TransportFailure {
                error: e.to_string(),
            },
        }
    }
}
