use std::fmt;
use std::str::FromStr;

use ag_core::{Error, Result};

pub mod composer;
pub mod extract;
pub mod models;
pub mod prompts;

pub const DEFAULT_MODEL_NAME: &str = "xiaomi/mimo-v2-flash:free";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    OpenRouter,
    Dummy,
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openrouter" => Ok(Provider::OpenRouter),
            "dummy" => Ok(Provider::Dummy),
            other => Err(Error::Config(format!("Unknown model provider: {}", other))),
        }
    }
}

#[derive(Clone, Default)]
pub struct Config {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
}

impl Config {
    pub fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL_NAME)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub mod prelude {
    pub use super::composer::{ArticleComposer, SeoComposer};
    pub use super::models::create_model;
    pub use super::{Config, Provider};
    pub use ag_core::{Article, ArticleSection, ChatModel, Error, Result, SeoMetadata};
}

pub use composer::{ArticleComposer, SeoComposer};
pub use models::create_model;
