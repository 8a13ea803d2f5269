//! Fan-out page rendering for the whole library.
//!
//! Rendering runs under a bounded worker pool; extraction and everything
//! after it runs sequentially on the coordinating task. Each work is
//! rendered in its own spawned task, so one work's failure can never cancel
//! a sibling's fetch.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::app::{Result, ShinkanError};
use crate::domain::WorkArtifact;
use crate::extract::{self, ExtractOptions};
use crate::render::Renderer;

pub const DEFAULT_WORKERS: usize = 4;

pub struct FetchOrchestrator {
    renderer: Arc<dyn Renderer>,
    semaphore: Arc<Semaphore>,
    options: ExtractOptions,
}

impl FetchOrchestrator {
    pub fn new(renderer: Arc<dyn Renderer>, options: ExtractOptions) -> Self {
        Self::with_workers(renderer, options, DEFAULT_WORKERS)
    }

    pub fn with_workers(
        renderer: Arc<dyn Renderer>,
        options: ExtractOptions,
        workers: usize,
    ) -> Self {
        Self {
            renderer,
            semaphore: Arc::new(Semaphore::new(workers)),
            options,
        }
    }

    /// Render every library entry concurrently, then dispatch and extract
    /// sequentially, yielding one result per work in scheduling order.
    ///
    /// A fetch or extraction failure is returned in that work's slot and
    /// logged with the work identity; the other works are unaffected.
    pub async fn scrape_all(
        &self,
        library: &[(String, String)],
    ) -> Vec<(String, Result<WorkArtifact>)> {
        let mut handles = Vec::new();

        for (title, url) in library {
            let renderer = self.renderer.clone();
            let semaphore = self.semaphore.clone();
            let render_url = url.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("Semaphore closed");
                renderer.render(&render_url).await
            });

            handles.push((title.clone(), url.clone(), handle));
        }

        let mut results = Vec::new();
        for (title, url, handle) in handles {
            let result = match handle.await {
                Ok(Ok(html)) => extract::extract(&title, &url, &html, &self.options),
                Ok(Err(e)) => Err(e),
                Err(e) => Err(ShinkanError::Render(format!("Task join error: {}", e))),
            };

            if let Err(ref e) = result {
                tracing::error!(work = %title, error = %e, "scrape failed");
            }

            results.push((title, result));
        }

        results
    }
}
