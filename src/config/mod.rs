//! Configuration management.
//!
//! Configuration is read from `~/.config/shinkan/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is
//! created. The loaded config is read-only for the run; core operations
//! receive it explicitly rather than through globals.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::render::RendererConfig;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracked works: display title → title page URL.
    pub library: BTreeMap<String, String>,
    pub renderer: RendererConfig,
    pub extract: ExtractConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// How many trailing chapter rows of a MangaPlus page to keep.
    pub mangaplus_tail: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            mangaplus_tail: crate::extract::mangaplus::DEFAULT_TAIL,
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating a commented
    /// default file on first run. Missing fields use default values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// The library as an ordered list of (title, url) pairs — the
    /// orchestrator's scheduling order.
    pub fn library_entries(&self) -> Vec<(String, String)> {
        self.library
            .iter()
            .map(|(title, url)| (title.clone(), url.clone()))
            .collect()
    }

    /// Get the default config file path: `~/.config/shinkan/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("shinkan").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Shinkan configuration
#
# Supported hosts: mangalib.me, mangaplus.shueisha.co.jp.
# Any other host in the library fails that work's scan with an
# "unsupported source" error.

[library]
# Display title = title page URL, e.g.:
# "One Piece" = "https://mangaplus.shueisha.co.jp/titles/100020"
# "Берсерк" = "https://mangalib.me/berserk?section=chapters"

[renderer]
# "chrome" renders script-heavy pages with headless Chrome,
# "http" does a plain GET (only for fully server-rendered pages)
kind = "chrome"

# Run the browser without a visible window
headless = true

# Per-page render timeout in seconds
timeout_secs = 30

# Wait after page load for client-side rendering to settle (milliseconds)
wait_after_load_ms = 3000

# Maximum concurrent browser pages
max_concurrency = 4

[extract]
# MangaPlus lists the whole backlog; only the last N rows matter
mangaplus_tail = 3
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
