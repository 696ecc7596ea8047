use ag_core::text::truncate_chars;
use ag_core::Article;

/// Context characters embedded in the article prompt.
pub const ARTICLE_CONTEXT_CHARS: usize = 4000;

/// Introduction characters embedded in the SEO prompt.
pub const SEO_INTRODUCTION_CHARS: usize = 500;

pub(crate) const ARTICLE_TOPIC_PREFIX: &str = "Write a comprehensive article about:";
pub(crate) const SEO_MARKER: &str = "generate SEO metadata";
pub(crate) const SEO_TITLE_PREFIX: &str = "Title:";

const ARTICLE_SHAPE: &str = r#"{
    "title": "Article Title",
    "introduction": "2-3 paragraph introduction",
    "sections": [
        {
            "heading": "Section Heading",
            "content": "Section content (2-3 paragraphs)"
        }
    ],
    "conclusion": "Concluding paragraph",
    "references": ["URL1", "URL2"]
}"#;

const SEO_SHAPE: &str = r#"{
    "title": "SEO optimized title (50-60 characters)",
    "description": "Meta description (150-160 characters)",
    "keywords": ["keyword1", "keyword2", "keyword3"],
    "meta_tags": {
        "og:title": "OG Title",
        "og:description": "OG Description"
    }
}"#;

pub fn article_prompt(query: &str, context: &str) -> String {
    format!(
        "{ARTICLE_TOPIC_PREFIX} {query}\n\n\
         Additional context: {context}\n\n\
         Generate a structured article with the following JSON format:\n\
         {ARTICLE_SHAPE}\n\n\
         Respond with ONLY the JSON, no additional text.",
        context = truncate_chars(context, ARTICLE_CONTEXT_CHARS),
    )
}

pub fn seo_prompt(article: &Article) -> String {
    format!(
        "Based on this article, {SEO_MARKER}:\n\n\
         {SEO_TITLE_PREFIX} {title}\n\
         Introduction: {introduction}\n\n\
         Generate JSON with:\n\
         {SEO_SHAPE}\n\n\
         Respond with ONLY the JSON, no additional text.",
        title = article.title,
        introduction = truncate_chars(&article.introduction, SEO_INTRODUCTION_CHARS),
    )
}
