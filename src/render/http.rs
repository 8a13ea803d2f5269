use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::render::Renderer;

/// Plain-HTTP renderer for pages that arrive fully server-rendered.
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(user_agent: Option<&str>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .user_agent(user_agent.unwrap_or(concat!("shinkan/", env!("CARGO_PKG_VERSION"))))
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

impl Default for HttpRenderer {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        Ok(response.text().await?)
    }
}
