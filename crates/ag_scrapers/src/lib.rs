pub mod context;
pub mod fetcher;
pub mod logging;
pub mod pipeline;
pub mod search;

#[cfg(test)]
pub(crate) mod test_utils;

pub use context::ContextAggregator;
pub use fetcher::HttpFetcher;
pub use logging::init_logging;
pub use pipeline::{ArticlePipeline, Stage};
pub use search::DuckDuckGoSearch;

pub mod prelude {
    pub use super::{ArticlePipeline, ContextAggregator, DuckDuckGoSearch, HttpFetcher};
    pub use ag_core::{Article, ArticleRequest, Error, GeneratedArticle, Result, SeoMetadata};
}
