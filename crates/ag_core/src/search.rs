use async_trait::async_trait;

/// Maximum number of URLs a provider returns for one query.
pub const MAX_SEARCH_RESULTS: usize = 5;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Searches the web for `query`. Never fails: errors are recorded in the outcome.
    async fn search(&self, query: &str) -> SearchOutcome;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    RateLimited(String),
    Unavailable(String),
}

impl SearchFailure {
    /// Classifies an error message, treating any "429" marker as throttling.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("429") {
            SearchFailure::RateLimited(message)
        } else {
            SearchFailure::Unavailable(message)
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SearchFailure::RateLimited(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub urls: Vec<String>,
    pub failure: Option<SearchFailure>,
}

impl SearchOutcome {
    pub fn found(urls: Vec<String>) -> Self {
        Self { urls, failure: None }
    }

    pub fn degraded(urls: Vec<String>, failure: SearchFailure) -> Self {
        Self {
            urls,
            failure: Some(failure),
        }
    }
}
