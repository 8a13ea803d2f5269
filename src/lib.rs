//! # Shinkan
//!
//! A release tracker for manga chapters: scrape the chapter lists of
//! tracked works, remember what has already been seen, and surface only
//! the unseen chapters until they are acknowledged.
//!
//! ## Architecture
//!
//! ```text
//! Renderer → Extractor → WorkArtifact → Reconciler → Sink
//!                                           ↕
//!                                         Store
//! ```
//!
//! - [`render`]: "URL to rendered HTML" collaborators (headless Chrome, HTTP)
//! - [`extract`]: per-site extractors behind a closed host dispatcher
//! - [`fetch`]: concurrent rendering with per-work failure isolation
//! - [`reconcile`]: unseen/seen decision against the store, acknowledgments
//! - [`store`]: document-oriented persistence, one collection per work
//!
//! ## Quick Start
//!
//! ```bash
//! # Track works in ~/.config/shinkan/config.toml, then:
//! shinkan seed    # first run: absorb the backlog
//! shinkan scan    # report unseen chapters
//! shinkan ack 42  # stop re-surfacing chapter 42
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires together store, renderer and
/// orchestrator; every core operation takes its state explicitly.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// TOML configuration: the tracked library, renderer and extraction knobs.
pub mod config;

/// Core domain models: [`Chapter`](domain::Chapter) and
/// [`WorkArtifact`](domain::WorkArtifact).
pub mod domain;

/// Per-site chapter extraction and host dispatch.
pub mod extract;

/// Concurrent fetch orchestration.
pub mod fetch;

/// Notification sink seam and the console implementation.
pub mod notify;

/// Read-state reconciliation and acknowledgment.
pub mod reconcile;

/// Page rendering collaborators.
pub mod render;

/// Document store trait and SQLite implementation.
pub mod store;
