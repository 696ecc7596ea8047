pub mod duckduckgo;

pub use duckduckgo::DuckDuckGoSearch;

/// Common utilities for search providers
pub(crate) mod utils {
    /// Removes repeated URLs while preserving the order of first appearance.
    pub fn dedup_preserving_order(urls: Vec<String>) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        urls.into_iter().filter(|url| seen.insert(url.clone())).collect()
    }
}
