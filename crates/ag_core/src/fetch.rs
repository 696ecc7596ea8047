use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetches `url` and returns the plain text of its paragraphs.
    ///
    /// A non-200 response yields an empty string, not an error.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Outcome of a single fetch at an aggregation call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageText {
    Content(String),
    Empty,
    Failed(String),
}

impl PageText {
    pub fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(text) if text.is_empty() => PageText::Empty,
            Ok(text) => PageText::Content(text),
            Err(e) => PageText::Failed(e.to_string()),
        }
    }

    pub fn into_content(self) -> Option<String> {
        match self {
            PageText::Content(text) => Some(text),
            PageText::Empty | PageText::Failed(_) => None,
        }
    }
}
