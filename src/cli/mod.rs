pub mod commands;

use clap::{Parser, Subcommand};

use crate::fetch::DEFAULT_WORKERS;

#[derive(Parser)]
#[command(name = "shinkan")]
#[command(about = "Track new manga chapter releases", long_about = None)]
pub struct Cli {
    /// Number of parallel render workers
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, global = true)]
    pub workers: usize,

    /// Database file path (default: platform data directory)
    #[arg(long, global = true)]
    pub db: Option<std::path::PathBuf>,

    /// Config file path (default: platform config directory)
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the library and report unseen chapters
    Scan,
    /// Mark a chapter as read
    Ack {
        /// Storage id of the chapter (printed by scan)
        id: i64,
    },
    /// List tracked works with unread counts
    List {
        /// Show every stored chapter instead
        #[arg(long)]
        chapters: bool,
    },
    /// First-run backfill: record the backlog and keep only the newest
    /// chapter of each work unread
    Seed,
}
