use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSection {
    pub heading: String,
    pub content: String,
}

/// A generated article, as returned by the model.
///
/// `sections` must be present in the model output (it may be empty);
/// `references` may be omitted and then defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub introduction: String,
    pub sections: Vec<ArticleSection>,
    pub conclusion: String,
    #[serde(default)]
    pub references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub meta_tags: BTreeMap<String, String>,
}

impl SeoMetadata {
    /// `og:title` if the model supplied one, otherwise the SEO title.
    pub fn og_title(&self) -> &str {
        self.meta_tags
            .get("og:title")
            .map(String::as_str)
            .unwrap_or(&self.title)
    }

    /// `og:description` if the model supplied one, otherwise the SEO description.
    pub fn og_description(&self) -> &str {
        self.meta_tags
            .get("og:description")
            .map(String::as_str)
            .unwrap_or(&self.description)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRequest {
    pub query: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedArticle {
    pub article: Article,
    pub seo: SeoMetadata,
    pub html: String,
}
