use std::sync::Arc;

use ag_core::text::truncate_chars;
use ag_core::{ContentFetcher, PageText, SearchProvider};
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Search results fetched per query.
pub const MAX_CONTEXT_PAGES: usize = 3;

/// Characters kept from each search-result page.
pub const MAX_PAGE_CHARS: usize = 2000;

pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Builds the grounding text handed to the article composer.
#[derive(Clone)]
pub struct ContextAggregator {
    fetcher: Arc<dyn ContentFetcher>,
    search: Arc<dyn SearchProvider>,
}

impl ContextAggregator {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, search: Arc<dyn SearchProvider>) -> Self {
        Self { fetcher, search }
    }

    async fn fetch_page(&self, url: &str) -> PageText {
        PageText::from_result(self.fetcher.fetch(url).await)
    }

    /// Gathers the seed page (uncapped) followed by up to three capped search-result pages.
    ///
    /// Never fails: fetch and search errors are logged and the context shrinks.
    pub async fn gather(&self, query: &str, seed_url: Option<&str>) -> String {
        let mut blocks = Vec::new();

        if let Some(url) = seed_url.map(str::trim).filter(|url| !url.is_empty()) {
            match self.fetch_page(url).await {
                PageText::Content(text) => blocks.push(text),
                PageText::Empty => debug!("Seed URL {} has no paragraph text", url),
                PageText::Failed(reason) => warn!("Error fetching URL {}: {}", url, reason),
            }
        }

        let outcome = self.search.search(query).await;
        if let Some(failure) = &outcome.failure {
            warn!(
                "{} search degraded ({:?}), continuing with {} results",
                self.search.name(),
                failure,
                outcome.urls.len()
            );
        }

        let urls = &outcome.urls[..outcome.urls.len().min(MAX_CONTEXT_PAGES)];
        let pages = join_all(urls.iter().map(|url| self.fetch_page(url))).await;
        for (url, page) in urls.iter().zip(pages) {
            match page {
                PageText::Content(text) => {
                    blocks.push(truncate_chars(&text, MAX_PAGE_CHARS).to_string())
                }
                PageText::Empty => debug!("No content at {}", url),
                PageText::Failed(reason) => warn!("Error fetching {}: {}", url, reason),
            }
        }

        let context = blocks.join(CONTEXT_SEPARATOR);
        info!("📚 Gathered {} context blocks ({} chars)", blocks.len(), context.chars().count());
        context
    }
}
