pub mod error;
pub mod fetch;
pub mod models;
pub mod search;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use fetch::{ContentFetcher, PageText};
pub use models::ChatModel;
pub use search::{SearchFailure, SearchOutcome, SearchProvider};
pub use types::{Article, ArticleRequest, ArticleSection, GeneratedArticle, SeoMetadata};
