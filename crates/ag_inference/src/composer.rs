use std::sync::Arc;

use ag_core::models::{ARTICLE_TEMPERATURE, SEO_TEMPERATURE};
use ag_core::{Article, ChatModel, Error, Result, SeoMetadata};
use tracing::{debug, info};

use crate::extract::extract_json_block;
use crate::prompts::{article_prompt, seo_prompt};

pub fn parse_article(completion: &str) -> Result<Article> {
    serde_json::from_str(extract_json_block(completion))
        .map_err(|e| Error::MalformedArticle(e.to_string()))
}

pub fn parse_seo(completion: &str) -> Result<SeoMetadata> {
    serde_json::from_str(extract_json_block(completion))
        .map_err(|e| Error::MalformedSeo(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct ArticleComposer {
    model: Arc<dyn ChatModel>,
}

impl ArticleComposer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Drafts an article about `query`, grounded on `context` (which may be empty).
    pub async fn compose(&self, query: &str, context: &str) -> Result<Article> {
        let prompt = article_prompt(query, context);
        info!("🤖 Composing article with {}", self.model.name());
        let completion = self.model.complete(&prompt, ARTICLE_TEMPERATURE).await?;
        debug!(completion_chars = completion.chars().count(), "Article completion received");
        let article = parse_article(&completion)?;
        info!("✨ Article composed: {} ({} sections)", article.title, article.sections.len());
        Ok(article)
    }
}

#[derive(Debug, Clone)]
pub struct SeoComposer {
    model: Arc<dyn ChatModel>,
}

impl SeoComposer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn compose(&self, article: &Article) -> Result<SeoMetadata> {
        let prompt = seo_prompt(article);
        info!("🔎 Composing SEO metadata with {}", self.model.name());
        let completion = self.model.complete(&prompt, SEO_TEMPERATURE).await?;
        let seo = parse_seo(&completion)?;
        info!("✨ SEO metadata composed: {} keywords", seo.keywords.len());
        Ok(seo)
    }
}
