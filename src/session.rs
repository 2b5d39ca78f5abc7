//! Hash, check the cache, then reuse or rebuild the index.
//!
//! ```text
//! INIT -> HASHING -> CACHE_CHECK -> REUSE | REBUILD -> READY -> SEARCHING
//! ```
//!
//! [`Session::open`] runs everything up to READY. Each call to
//! [`Session::search`] answers one query; the caller owns the loop.

use crate::error::Result;
use crate::index::extract::IndexBuilder;
use crate::index::hasher::fingerprint_file;
use crate::index::store::IndexStore;
use crate::index::types::{CacheEntry, Fingerprint, Index};
use crate::query::{SearchMatch, search};
use crate::utils::CorruptCachePolicy;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where the resident index came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// The cached fingerprint matched; extraction was skipped
    Reused,
    /// Extraction ran and the cache artifact was overwritten
    Rebuilt,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Rebuild even when the cached fingerprint matches
    pub force_rebuild: bool,
    pub corrupt_cache: CorruptCachePolicy,
}

/// Result of one query
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    Matches(Vec<SearchMatch<'a>>),
    NoMatches,
}

impl<'a> SearchOutcome<'a> {
    pub fn matches(&self) -> &[SearchMatch<'a>] {
        match self {
            SearchOutcome::Matches(matches) => matches,
            SearchOutcome::NoMatches => &[],
        }
    }
}

/// A document whose index is resident and ready for queries
#[derive(Debug)]
pub struct Session {
    document: PathBuf,
    fingerprint: Fingerprint,
    index: Index,
    source: IndexSource,
}

impl Session {
    /// Bring the index for `document` into memory, rebuilding the cache when
    /// its fingerprint no longer matches.
    pub fn open<B: IndexBuilder + ?Sized>(
        document: &Path,
        store: &IndexStore,
        builder: &B,
        options: SessionOptions,
    ) -> Result<Self> {
        debug!(document = %document.display(), "hashing");
        let fingerprint = fingerprint_file(document)?;

        debug!(cache = %store.path().display(), "checking cache");
        let cached = match store.load() {
            Ok(cached) => cached,
            Err(e) if e.is_cache_corruption() && options.corrupt_cache == CorruptCachePolicy::Rebuild => {
                warn!(error = %e, "ignoring unreadable cache artifact");
                None
            }
            Err(e) => return Err(e),
        };

        let reusable = match cached {
            Some(entry) if entry.fingerprint == fingerprint && !options.force_rebuild => Some(entry.index),
            Some(_) if options.force_rebuild => {
                debug!("rebuild forced");
                None
            }
            Some(entry) => {
                debug!(stored = %entry.fingerprint, current = %fingerprint, "fingerprint changed");
                None
            }
            None => None,
        };

        if let Some(index) = reusable {
            info!(lines = index.len(), "reusing cached index");
            return Ok(Self {
                document: document.to_path_buf(),
                fingerprint,
                index,
                source: IndexSource::Reused,
            });
        }

        let started = Instant::now();
        let index = builder.build_index(document)?;
        let entry = CacheEntry::new(fingerprint, index);
        store.save(&entry)?;
        info!(
            lines = entry.index.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rebuilt index"
        );

        Ok(Self {
            document: document.to_path_buf(),
            fingerprint: entry.fingerprint,
            index: entry.index,
            source: IndexSource::Rebuilt,
        })
    }

    /// Answer a single query against the resident index
    pub fn search(&self, query: &str) -> SearchOutcome<'_> {
        let matches = search(&self.index, query);
        debug!(query, hits = matches.len(), "search");
        if matches.is_empty() {
            SearchOutcome::NoMatches
        } else {
            SearchOutcome::Matches(matches)
        }
    }

    pub fn document(&self) -> &Path {
        &self.document
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn source(&self) -> IndexSource {
        self.source
    }
}
