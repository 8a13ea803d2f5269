//! Per-site chapter extraction and host-based dispatch.
//!
//! Each supported host has one extractor: a pure function from rendered
//! page HTML to an ordered list of [`Chapter`]s. [`Source`] is a closed set;
//! adding a host means adding a variant, a dispatch arm, and an extractor
//! module. Ordering and deduplication are the reconciler's job, extractors
//! return rows exactly as the page shows them.

pub mod mangalib;
pub mod mangaplus;

use url::Url;

use crate::app::{Result, ShinkanError};
use crate::domain::{Chapter, WorkArtifact};

/// Knobs that vary per deployment, not per call.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// How many trailing rows of a MangaPlus page to keep.
    pub mangaplus_tail: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mangaplus_tail: mangaplus::DEFAULT_TAIL,
        }
    }
}

/// The supported hosting sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    MangaLib,
    MangaPlus,
}

impl Source {
    /// Resolve the extractor for a work URL by its host name.
    ///
    /// An unknown host is a configuration error and surfaces immediately,
    /// no extractor runs for it.
    pub fn for_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)?;
        match parsed.host_str() {
            Some("mangalib.me") => Ok(Self::MangaLib),
            Some("mangaplus.shueisha.co.jp") => Ok(Self::MangaPlus),
            Some(host) => Err(ShinkanError::UnsupportedSource(host.to_string())),
            None => Err(ShinkanError::UnsupportedSource(url.to_string())),
        }
    }

    pub fn extract(
        &self,
        work_title: &str,
        html: &str,
        options: &ExtractOptions,
    ) -> Result<Vec<Chapter>> {
        match self {
            Self::MangaLib => mangalib::extract(work_title, html),
            Self::MangaPlus => mangaplus::extract(work_title, html, options.mangaplus_tail),
        }
    }
}

/// Dispatch on the work URL's host and extract one [`WorkArtifact`] from
/// its rendered page.
pub fn extract(
    work_title: &str,
    url: &str,
    html: &str,
    options: &ExtractOptions,
) -> Result<WorkArtifact> {
    let source = Source::for_url(url)?;
    let chapters = source.extract(work_title, html, options)?;
    Ok(WorkArtifact::new(work_title, chapters))
}
