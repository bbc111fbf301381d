//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the page server and its
//! evaluation endpoint, and run the full discover / revisit / submit cycle
//! end-to-end.

use freshrank::config::Config;
use freshrank::crawler::{crawl, Coordinator};
use freshrank::output::StopReason;
use freshrank::FreshrankError;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renders a page in the page server's document format
fn page_html(id: &str, version: &str, links: &[&str], history: &[&str]) -> String {
    let rows: String = links
        .iter()
        .map(|link| {
            format!(
                r#"<tr><td><a class="file-link" href="/{}">{}</a></td></tr>"#,
                link, link
            )
        })
        .collect();
    let entries: String = history
        .iter()
        .enumerate()
        .map(|(i, at)| format!(r#"<div style="margin-left: 1rem">• node{} ({} UTC)</div>"#, i, at))
        .collect();

    format!(
        r#"<html><head><title>{id}</title></head><body>
        <div class="page-id">Page ID: {id}</div>
        <span class="node-id">Node ID: <b>{version}</b></span>
        <table class="files-table">{rows}</table>
        <details><summary>History</summary>{entries}</details>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, window: f64, interval: f64) -> Config {
    let mut config = Config::default();
    config.server.base_url = base_url.to_string();
    config.timing.window_seconds = window;
    config.timing.submission_interval_seconds = interval;
    config.timing.politeness_delay_ms = 0;
    config.timing.request_timeout_seconds = 2;
    config
}

/// Bodies of every submission the mock server received
async fn submitted_payloads(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == "/evaluate")
        .map(|request| serde_json::from_slice(&request.body).expect("Payload is not JSON"))
        .collect()
}

#[tokio::test]
async fn test_full_run_single_server() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", page_html("page_root", "r1", &["page_a", "page_b"], &[])).await;
    mount_page(&mock_server, "/page_a", page_html("page_a", "a1", &["page_b"], &[])).await;
    mount_page(&mock_server, "/page_b", page_html("page_b", "b1", &["page_a"], &[])).await;

    Mock::given(method("POST"))
        .and(path("/evaluate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "coverage": 1.0,
            "avg_staleness": 0.25
        })))
        .expect(2..)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1.2, 0.4);
    let stats = crawl(config).await.expect("Run failed");

    assert_eq!(stats.pages_discovered, 3);
    assert_eq!(stats.discovery_failures, 0);
    assert_eq!(stats.stop_reason, StopReason::Deadline);
    assert!(stats.submissions_accepted >= 2);
    assert_eq!(stats.submissions_failed, 0);
    assert_eq!(
        stats.last_feedback.as_ref().and_then(|f| f.get("coverage")),
        Some(1.0)
    );
    assert_eq!(stats.freshness.pages.len(), 3);

    for payload in submitted_payloads(&mock_server).await {
        let entries = payload["entries"].as_array().expect("Missing entries");
        assert_eq!(entries.len(), 3);

        let mut ids: Vec<&str> = entries
            .iter()
            .map(|e| e["page_id"].as_str().unwrap())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["page_a", "page_b", "page_root"]);

        let total: f64 = entries.iter().map(|e| e["score"].as_f64().unwrap()).sum();
        assert!((total - 1.0).abs() < 1e-6, "scores sum to {}", total);

        let root = entries.iter().find(|e| e["page_id"] == "page_root").unwrap();
        assert_eq!(root["latest_node_id"], "r1");
    }
}

#[tokio::test]
async fn test_window_ended_stops_run() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", page_html("page_root", "r1", &[], &[])).await;

    Mock::given(method("POST"))
        .and(path("/evaluate"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Evaluation period has ended"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 30.0, 0.2);
    let stats = crawl(config).await.expect("Run failed");

    assert_eq!(stats.cycles, 1);
    assert_eq!(stats.submissions_accepted, 0);
    assert!(matches!(stats.stop_reason, StopReason::WindowClosed { .. }));
    assert!(stats.elapsed.as_secs_f64() < 5.0);
}

#[tokio::test]
async fn test_unreachable_root_fails_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/evaluate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1.0, 0.5);
    let result = crawl(config).await;

    assert!(matches!(
        result,
        Err(FreshrankError::NothingDiscovered { .. })
    ));
}

#[tokio::test]
async fn test_broken_pages_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        page_html("page_root", "r1", &["page_a", "page_missing", "page_garbled"], &[]),
    )
    .await;
    mount_page(&mock_server, "/page_a", page_html("page_a", "a1", &["page_missing"], &[])).await;
    mount_page(
        &mock_server,
        "/page_garbled",
        "<html><body>Not a page</body></html>".to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page_missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/evaluate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"coverage": 0.5})))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 0.6, 0.3);
    let stats = crawl(config).await.expect("Run failed");

    assert_eq!(stats.pages_discovered, 2);
    assert_eq!(stats.discovery_failures, 2);

    let payloads = submitted_payloads(&mock_server).await;
    assert!(!payloads.is_empty());
    for payload in payloads {
        let ids: Vec<&str> = payload["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["page_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["page_a", "page_root"]);
    }
}

#[tokio::test]
async fn test_stale_page_refetched_each_cycle() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", page_html("page_root", "r1", &["page_hot", "page_cold"], &[])).await;

    // Last known update lies in the future, so every visit looks stale
    Mock::given(method("GET"))
        .and(path("/page_hot"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            "page_hot",
            "h1",
            &[],
            &["2099-01-01 00:00:00", "2099-01-01 00:00:30"],
        )))
        .expect(3..)
        .mount(&mock_server)
        .await;

    // No history: only revisited after the fallback interval
    Mock::given(method("GET"))
        .and(path("/page_cold"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            "page_cold",
            "c1",
            &[],
            &[],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/evaluate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1.0, 0.25);
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Run failed");

    assert!(stats.revisits >= 2);
    assert_eq!(coordinator.context().visits.visits("page_cold").len(), 1);
    assert_eq!(
        coordinator.context().visits.visits("page_hot").len(),
        stats.revisits + 1
    );
}
