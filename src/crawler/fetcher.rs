//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building HTTP clients with a proper user agent string
//! - GET requests to `<base>/<path>`
//! - Extraction of the structured page record
//! - Error classification into soft failure kinds

use crate::config::{Config, UserAgentConfig};
use crate::crawler::parser::{parse_page, ExtractError};
use crate::state::PageDocument;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
///
/// Every variant except `Success` is a soft failure: the caller logs it and
/// moves on, it never aborts the crawl.
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched and extracted the page
    Success(PageDocument),

    /// Server answered with a non-success status
    BadStatus {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    TransportFailure {
        /// Error description
        error: String,
    },

    /// Body was received but no page record could be produced from it
    ExtractionFailure {
        /// What was missing
        error: ExtractError,
    },
}

/// Anything that can fetch a page by path
///
/// The crawler only depends on this contract, so discovery and the main
/// loop can be driven by an in-memory source in tests.
pub trait PageSource: Send + Sync + 'static {
    /// Fetches the page at `path` (relative to the source's base)
    fn fetch(&self, path: &str) -> impl Future<Output = FetchResult> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", config.crawler_name, config.crawler_version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Joins a page path onto the server base URL
///
/// `""` addresses `<base>/`, `"page_a"` addresses `<base>/page_a`.
pub fn page_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
}

/// Page source backed by the remote page server
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Creates a fetcher from the crawler configuration
    pub fn from_config(config: &Config) -> Result<Self, crate::FreshrankError> {
        let client = build_http_client(&config.user_agent, config.timing.request_timeout())?;
        let base_url = Url::parse(&config.server.base_url)?;
        Ok(Self::new(client, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl PageSource for HttpFetcher {
    async fn fetch(&self, path: &str) -> FetchResult {
        let url = match page_url(&self.base_url, path) {
            Ok(url) => url,
            Err(e) => {
                return FetchResult::TransportFailure {
                    error: format!("invalid page path '{}': {}", path, e),
                }
            }
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchResult::TransportFailure { error: classify(&e) },
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::BadStatus {
                status_code: status.as_u16(),
            };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchResult::TransportFailure { error: classify(&e) },
        };

        match parse_page(&body) {
            Ok(doc) => FetchResult::Success(doc),
            Err(error) => FetchResult::ExtractionFailure { error },
        }
    }
}

fn classify(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}
