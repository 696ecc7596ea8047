use std::fmt;
use std::time::Duration;

use ag_core::{ChatModel, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::Config;

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion client for OpenRouter and other OpenAI-compatible endpoints.
pub struct OpenRouterModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenRouterModel {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("OpenRouter API key is required".to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model_name().to_string(),
            base_url: config.base_url().to_string(),
        })
    }

    fn content_from(body: Value) -> Result<String> {
        let response: ChatResponse = serde_json::from_value(body.clone())
            .map_err(|e| Error::UpstreamResponse(format!("{}: {}", e, body)))?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::UpstreamResponse(format!("no choices in {}", body)))?;
        choice
            .message
            .and_then(|message| message.content)
            .ok_or_else(|| Error::UpstreamResponse("no content received".to_string()))
    }
}

impl fmt::Debug for OpenRouterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl ChatModel for OpenRouterModel {
    fn name(&self) -> &str {
        "OpenRouter"
    }

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "Sending chat completion"
        );
        let body = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Self::content_from(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn model_for(server: &Server) -> OpenRouterModel {
        OpenRouterModel::new(&Config {
            api_key: Some("test-key".to_string()),
            model_name: Some("test/model".to_string()),
            base_url: Some(server.url()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_model_requires_api_key() {
        let result = OpenRouterModel::new(&Config::default());
        assert!(matches!(result, Err(Error::Config(_))));

        let result = OpenRouterModel::new(&Config {
            api_key: Some("  ".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_complete_sends_single_user_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "test/model",
                "messages": [{"role": "user", "content": "hello"}],
                "temperature": 0.5
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"hi there"}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let model = model_for(&server);
        let content = model.complete("hello", 0.5).await.unwrap();
        assert_eq!(content, "hi there");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_choices_is_upstream_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let result = model_for(&server).complete("hello", 0.7).await;
        assert!(matches!(result, Err(Error::UpstreamResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_choices_is_upstream_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"quota exceeded"}}"#)
            .create_async()
            .await;

        let result = model_for(&server).complete("hello", 0.7).await;
        assert!(matches!(result, Err(Error::UpstreamResponse(_))));
    }

    #[tokio::test]
    async fn test_null_content_is_upstream_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
            .create_async()
            .await;

        let result = model_for(&server).complete("hello", 0.7).await;
        assert!(matches!(result, Err(Error::UpstreamResponse(_))));
    }

    #[tokio::test]
    async fn test_error_status_is_http_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let result = model_for(&server).complete("hello", 0.7).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
