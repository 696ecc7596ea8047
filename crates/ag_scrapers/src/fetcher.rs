use std::time::Duration;

use ag_core::{ContentFetcher, Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use tracing::debug;

pub const FETCH_TIMEOUT_SECS: u64 = 30;

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Returns the text of every `<p>` element, joined with single spaces.
pub fn extract_paragraphs(html: &str) -> Result<String> {
    let selector = Selector::parse("p")
        .map_err(|e| Error::Fetch(format!("Invalid selector: {}", e)))?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" "))
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

        if response.status() != StatusCode::OK {
            debug!("Skipping {} (status {})", url, response.status());
            return Ok(String::new());
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;
        let text = extract_paragraphs(&html)?;
        debug!(chars = text.chars().count(), "Fetched {}", url);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn test_extract_paragraphs() {
        let html = r#"
            <html><body>
                <h1>Ignored heading</h1>
                <p>First <b>bold</b> paragraph.</p>
                <div><p>Second paragraph.</p></div>
                <span>Ignored span</span>
            </body></html>
        "#;
        assert_eq!(
            extract_paragraphs(html).unwrap(),
            "First bold paragraph. Second paragraph."
        );
        assert_eq!(extract_paragraphs("<div>no paragraphs</div>").unwrap(), "");
    }

    #[tokio::test]
    async fn test_fetch_paragraph_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/article")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<p>Solar panels convert light.</p><p>They are cheap now.</p>")
            .expect(1)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let text = fetcher.fetch(&format!("{}/article", server.url())).await.unwrap();
        assert_eq!(text, "Solar panels convert light. They are cheap now.");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_200_is_empty() {
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();
        for (path, status) in [("/missing", 404), ("/broken", 500), ("/accepted", 202)] {
            let mock = server
                .mock("GET", path)
                .with_status(status)
                .with_body("<p>should not be read</p>")
                .create_async()
                .await;
            mocks.push(mock);
        }

        let fetcher = HttpFetcher::new().unwrap();
        for path in ["/missing", "/broken", "/accepted"] {
            let text = fetcher.fetch(&format!("{}{}", server.url(), path)).await.unwrap();
            assert_eq!(text, "", "{} should yield no content", path);
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(Error::Fetch(_))));
    }
}
