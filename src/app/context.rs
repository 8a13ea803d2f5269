use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{Result, ShinkanError};
use crate::config::Config;
use crate::extract::ExtractOptions;
use crate::fetch::FetchOrchestrator;
use crate::render::{ChromeRenderer, HttpRenderer, Renderer, RendererKind};
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub orchestrator: FetchOrchestrator,
    pub config: Config,
}

impl AppContext {
    pub async fn new(config: Config, db_path: Option<PathBuf>, workers: usize) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        let store = Arc::new(SqliteStore::new(&db_path)?);

        let renderer: Arc<dyn Renderer> = match config.renderer.kind {
            RendererKind::Chrome => Arc::new(ChromeRenderer::new(config.renderer.clone()).await?),
            RendererKind::Http => {
                Arc::new(HttpRenderer::new(config.renderer.user_agent.as_deref()))
            }
        };

        Ok(Self::assemble(store, renderer, config, workers))
    }

    /// Wire a context around caller-supplied collaborators. Used by tests
    /// to run the full pipeline against an in-memory store and a stub
    /// renderer.
    pub fn with_parts(
        store: Arc<SqliteStore>,
        renderer: Arc<dyn Renderer>,
        config: Config,
        workers: usize,
    ) -> Self {
        Self::assemble(store, renderer, config, workers)
    }

    fn assemble(
        store: Arc<SqliteStore>,
        renderer: Arc<dyn Renderer>,
        config: Config,
        workers: usize,
    ) -> Self {
        let options = ExtractOptions {
            mangaplus_tail: config.extract.mangaplus_tail,
        };
        let orchestrator = FetchOrchestrator::with_workers(renderer, options, workers);

        Self {
            store,
            orchestrator,
            config,
        }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ShinkanError::Config("Could not find data directory".into()))?;
        let shinkan_dir = data_dir.join("shinkan");
        std::fs::create_dir_all(&shinkan_dir)?;
        Ok(shinkan_dir.join("shinkan.db"))
    }
}
