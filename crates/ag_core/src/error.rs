use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Search error: {0}")]
    Search(String),

    /// The completion endpoint answered, but without the `choices[0].message.content` we need.
    #[error("Invalid response from LLM provider: {0}")]
    UpstreamResponse(String),

    #[error("Malformed article: {0}")]
    MalformedArticle(String),

    #[error("Malformed SEO metadata: {0}")]
    MalformedSeo(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True for failures caused by the LLM provider rather than by us.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::UpstreamResponse(_) | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
