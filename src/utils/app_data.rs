use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "pdfline";
const CONFIG_FILE: &str = "config.json";

/// Default cache artifact, relative to the working directory
pub const DEFAULT_CACHE_FILE: &str = "pdf_index.bin";

/// What to do when the cache artifact exists but cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptCachePolicy {
    /// Surface the decode failure and stop
    #[default]
    Fail,
    /// Log a warning and rebuild as if no cache existed
    Rebuild,
}

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Location of the cache artifact
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Number of extraction workers.
    /// If 0, uses the number of CPU cores
    #[serde(default)]
    pub worker_threads: usize,

    #[serde(default)]
    pub corrupt_cache: CorruptCachePolicy,

    /// Highlight matches in terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_FILE)
}

fn default_color() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            worker_threads: 0,
            corrupt_cache: CorruptCachePolicy::default(),
            color: default_color(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        // No home directory means no saved config either
        let Ok(config_path) = get_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from(&config_path)
    }

    /// Load config from an explicit file, or return default if not found
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
        Ok(config)
    }

    /// Get the effective worker count (resolves 0 to CPU count)
    pub fn effective_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            num_cpus()
        } else {
            self.worker_threads
        }
    }
}

/// Get the number of CPUs available
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the per-user application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    Ok(base.join(APP_NAME))
}
