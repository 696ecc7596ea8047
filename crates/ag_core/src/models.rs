use std::fmt;

use async_trait::async_trait;

use crate::Result;

/// Temperature used when drafting the article body.
pub const ARTICLE_TEMPERATURE: f32 = 0.7;

/// Temperature used when drafting SEO metadata.
pub const SEO_TEMPERATURE: f32 = 0.5;

#[async_trait]
pub trait ChatModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Sends `prompt` as a single user message and returns the text of the first choice.
    ///
    /// Implementations fail with [`crate::Error::UpstreamResponse`] when the
    /// provider answers without any choices or without message content.
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String>;
}
