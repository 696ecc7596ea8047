use std::fmt;
use std::sync::Mutex;

use ag_core::{ChatModel, Result};
use serde_json::json;

use crate::prompts::{ARTICLE_TOPIC_PREFIX, SEO_MARKER, SEO_TITLE_PREFIX};

/// Offline model that answers article and SEO prompts with canned JSON.
///
/// Answers are wrapped in prose and a code fence, the way hosted models
/// often reply, and every prompt received is kept for inspection.
#[derive(Default)]
pub struct DummyModel {
    prompts: Mutex<Vec<String>>,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    fn line_value<'a>(prompt: &'a str, prefix: &str) -> Option<&'a str> {
        prompt
            .lines()
            .find_map(|line| line.trim().strip_prefix(prefix))
            .map(str::trim)
    }

    fn article_reply(topic: &str) -> String {
        let article = json!({
            "title": format!("Understanding {}", topic),
            "introduction": format!(
                "{} is a topic worth a closer look.\nThis article covers the basics.",
                topic
            ),
            "sections": [
                {
                    "heading": "Background",
                    "content": format!("Some background on {}.", topic)
                },
                {
                    "heading": "Practical advice",
                    "content": "Start small.\nMeasure what matters."
                }
            ],
            "conclusion": format!("{} rewards careful study.", topic),
            "references": []
        });
        format!("Here is the article you asked for:\n```json\n{:#}\n```", article)
    }

    fn seo_reply(title: &str) -> String {
        let seo = json!({
            "title": title,
            "description": format!("A practical guide: {}", title),
            "keywords": title.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>(),
            "meta_tags": {
                "og:title": title
            }
        });
        format!("{:#}", seo)
    }
}

#[async_trait::async_trait]
impl ChatModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, prompt: &str, _temperature: f32) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if prompt.contains(SEO_MARKER) {
            let title = Self::line_value(prompt, SEO_TITLE_PREFIX).unwrap_or("Untitled");
            return Ok(Self::seo_reply(title));
        }
        let topic = Self::line_value(prompt, ARTICLE_TOPIC_PREFIX).unwrap_or("this topic");
        Ok(Self::article_reply(topic))
    }
}
