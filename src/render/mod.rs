pub mod chrome;
pub mod http;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app::Result;

pub use chrome::ChromeRenderer;
pub use http::HttpRenderer;

/// Content-rendering collaborator: URL in, fully rendered page HTML out.
///
/// Latency and failure modes are opaque to the rest of the crate; a failed
/// render is isolated per work by the orchestrator.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String>;
}

/// Which renderer implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless Chrome, required for script-heavy chapter lists.
    Chrome,
    /// Plain HTTP GET, enough for static pages.
    Http,
}

/// Configuration for the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub kind: RendererKind,

    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Per-page render timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Wait time after page load for dynamic content in milliseconds (default: 3000)
    pub wait_after_load_ms: u64,

    /// Maximum concurrent browser pages (default: 4)
    pub max_concurrency: usize,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::Chrome,
            headless: true,
            timeout_secs: 30,
            wait_after_load_ms: 3000,
            max_concurrency: 4,
            user_agent: None,
        }
    }
}

impl RendererConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn wait_after_load(&self) -> Duration {
        Duration::from_millis(self.wait_after_load_ms)
    }
}
