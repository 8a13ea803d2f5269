use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::sync::Semaphore;

use crate::app::{Result, ShinkanError};
use crate::render::{Renderer, RendererConfig};

/// Headless-Chrome renderer built on chromiumoxide.
///
/// Chapter lists on the supported sites are assembled client-side, so a
/// plain GET returns an empty shell; the browser runs the page scripts and
/// hands back the settled DOM.
pub struct ChromeRenderer {
    browser: Arc<Browser>,
    config: RendererConfig,
    semaphore: Arc<Semaphore>,
}

impl ChromeRenderer {
    pub async fn new(config: RendererConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer");

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ShinkanError::Render(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ShinkanError::Render(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Drive the browser websocket
        tokio::spawn(async move { while handler.next().await.is_some() {} });

        let semaphore = Arc::new(Semaphore::new(config.max_concurrency));

        Ok(Self {
            browser: Arc::new(browser),
            config,
            semaphore,
        })
    }

    pub async fn with_defaults() -> Result<Self> {
        Self::new(RendererConfig::default()).await
    }

    async fn render_page(&self, url: &str) -> Result<String> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| ShinkanError::Render(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = self.config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| ShinkanError::Render(format!("Failed to set user agent: {}", e)))?;
        }

        page.wait_for_navigation()
            .await
            .map_err(|e| ShinkanError::Render(format!("Navigation failed: {}", e)))?;

        // Let client-side rendering settle
        tokio::time::sleep(self.config.wait_after_load()).await;

        let html = page
            .content()
            .await
            .map_err(|e| ShinkanError::Render(format!("Failed to read page content: {}", e)))?;

        let _ = page.close().await;

        if html.is_empty() {
            return Err(ShinkanError::Render(format!("Empty page for {}", url)));
        }

        Ok(html)
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| ShinkanError::Render(format!("Semaphore error: {}", e)))?;

        tokio::time::timeout(self.config.timeout(), self.render_page(url))
            .await
            .map_err(|_| {
                ShinkanError::Render(format!(
                    "Render of {} timed out after {}s",
                    url, self.config.timeout_secs
                ))
            })?
    }
}
