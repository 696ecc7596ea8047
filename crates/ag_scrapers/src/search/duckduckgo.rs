use std::time::Duration;

use ag_core::search::MAX_SEARCH_RESULTS;
use ag_core::{Error, Result, SearchFailure, SearchOutcome, SearchProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use tracing::{info, warn};
use url::Url;

use super::utils::dedup_preserving_order;
use crate::fetcher::USER_AGENT;

pub const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";

/// How long to back off after the search backend throttles us.
pub const RATE_LIMIT_PAUSE: Duration = Duration::from_secs(5);

const SEARCH_TIMEOUT_SECS: u64 = 30;
const DUCKDUCKGO_HOME: &str = "https://duckduckgo.com/";

/// Resolves a result link to the destination URL.
///
/// DuckDuckGo wraps organic results in `/l/?uddg=<encoded target>` redirects;
/// other links on its own domain (ads, navigation) are dropped.
pub fn resolve_result_url(href: &str) -> Option<String> {
    let base = Url::parse(DUCKDUCKGO_HOME).ok()?;
    let parsed = base.join(href).ok()?;

    let on_duckduckgo = parsed
        .host_str()
        .map_or(false, |host| host == "duckduckgo.com" || host.ends_with(".duckduckgo.com"));
    if on_duckduckgo {
        if !parsed.path().starts_with("/l/") {
            return None;
        }
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
            .filter(|target| target.starts_with("http"));
    }

    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}

/// Classifies a search error, preferring the HTTP status over the "429" text marker.
fn failure_for(error: &Error) -> SearchFailure {
    match error {
        Error::Http(e) => match e.status() {
            Some(StatusCode::TOO_MANY_REQUESTS) => SearchFailure::RateLimited(e.to_string()),
            Some(_) => SearchFailure::Unavailable(e.to_string()),
            None => SearchFailure::classify(e.to_string()),
        },
        other => SearchFailure::classify(other.to_string()),
    }
}

/// Extracts up to `max_results` result URLs from a DuckDuckGo HTML results page.
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<String>> {
    let link_selector = Selector::parse("a.result__a")
        .map_err(|e| Error::Search(format!("Invalid selector: {}", e)))?;
    let document = Html::parse_document(html);

    let urls = document
        .select(&link_selector)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(resolve_result_url)
        .collect::<Vec<_>>();

    Ok(dedup_preserving_order(urls).into_iter().take(max_results).collect())
}

/// Web search backed by the DuckDuckGo HTML endpoint.
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    base_url: String,
    max_results: usize,
    rate_limit_pause: Duration,
}

impl DuckDuckGoSearch {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: MAX_SEARCH_RESULTS,
            rate_limit_pause: RATE_LIMIT_PAUSE,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_rate_limit_pause(mut self, pause: Duration) -> Self {
        self.rate_limit_pause = pause;
        self
    }

    /// Runs the query, pushing results into `urls` as they are found.
    async fn collect_urls(&self, query: &str, urls: &mut Vec<String>) -> Result<()> {
        let body = self
            .client
            .post(format!("{}/html/", self.base_url))
            .form(&[("q", query)])
            .header("Accept", "text/html")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        urls.extend(parse_results(&body, self.max_results)?);
        Ok(())
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "DuckDuckGo"
    }

    async fn search(&self, query: &str) -> SearchOutcome {
        let mut urls = Vec::new();
        match self.collect_urls(query, &mut urls).await {
            Ok(()) => {
                info!("🔍 Found {} results for \"{}\"", urls.len(), query);
                SearchOutcome::found(urls)
            }
            Err(e) => {
                warn!("Search error: {}", e);
                let failure = failure_for(&e);
                if failure.is_rate_limited() {
                    warn!("Search rate limited, pausing for {:?}", self.rate_limit_pause);
                    tokio::time::sleep(self.rate_limit_pause).await;
                }
                SearchOutcome::degraded(urls, failure)
            }
        }
    }
}
