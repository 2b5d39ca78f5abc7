use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fingerprinting, extracting, or caching an index.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open document {}: {reason}", path.display())]
    DocumentOpen { path: PathBuf, reason: String },

    #[error("failed to extract text from page {page}: {reason}")]
    PageExtraction { page: u32, reason: String },

    #[error("cache artifact {} is corrupt: {reason}", path.display())]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("cache artifact {} has format version {found}, expected {expected}", path.display())]
    CacheVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("failed to start extraction workers: {0}")]
    WorkerPool(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors that mean the cache artifact exists but cannot be used.
    pub fn is_cache_corruption(&self) -> bool {
        matches!(self, Error::CacheCorrupt { .. } | Error::CacheVersion { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
