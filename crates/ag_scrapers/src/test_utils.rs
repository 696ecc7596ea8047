use std::collections::HashMap;
use std::sync::Mutex;

use ag_core::{ContentFetcher, Error, Result, SearchFailure, SearchOutcome, SearchProvider};
use async_trait::async_trait;

/// Serves canned page text; URLs mapped to `None` fail, unknown URLs return "".
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, Option<String>>,
    requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), Some(text.to_string()));
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), None);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Some(text)) => Ok(text.clone()),
            Some(None) => Err(Error::Fetch(format!("{}: connection reset", url))),
            None => Ok(String::new()),
        }
    }
}

pub struct StubSearch {
    outcome: SearchOutcome,
}

impl StubSearch {
    pub fn returning(urls: &[&str]) -> Self {
        Self {
            outcome: SearchOutcome::found(urls.iter().map(|url| url.to_string()).collect()),
        }
    }

    pub fn throttled() -> Self {
        Self {
            outcome: SearchOutcome::degraded(
                Vec::new(),
                SearchFailure::RateLimited("429 Too Many Requests".to_string()),
            ),
        }
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    fn name(&self) -> &str {
        "Stub"
    }

    async fn search(&self, _query: &str) -> SearchOutcome {
        self.outcome.clone()
    }
}
