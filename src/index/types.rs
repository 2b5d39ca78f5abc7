use serde::Serialize;
use std::fmt;

/// 1-based page number
pub type PageNumber = u32;

/// 1-based line number within a page
pub type LineNumber = u32;

/// One line of extracted page text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    pub page: PageNumber,
    pub line: LineNumber,
    pub text: String,
}

impl LineRecord {
    pub fn new(page: PageNumber, line: LineNumber, text: impl Into<String>) -> Self {
        Self {
            page,
            line,
            text: text.into(),
        }
    }
}

/// Ordered line records for a single document (page order, then line order)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    records: Vec<LineRecord>,
}

impl Index {
    pub fn new(records: Vec<LineRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct pages that contributed at least one line
    pub fn page_count(&self) -> usize {
        let mut pages = 0;
        let mut last = None;
        for record in &self.records {
            if last != Some(record.page) {
                pages += 1;
                last = Some(record.page);
            }
        }
        pages
    }

    pub fn into_records(self) -> Vec<LineRecord> {
        self.records
    }
}

impl From<Vec<LineRecord>> for Index {
    fn from(records: Vec<LineRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a Index {
    type Item = &'a LineRecord;
    type IntoIter = std::slice::Iter<'a, LineRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Hex digest of a document's full byte content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Length of the hex digest in characters
    pub const LEN: usize = 64;

    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single persisted (fingerprint, index) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub index: Index,
}

impl CacheEntry {
    pub fn new(fingerprint: Fingerprint, index: Index) -> Self {
        Self { fingerprint, index }
    }
}

/// Configuration for the indexer
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Extraction worker count, 0 means available parallelism
    pub worker_threads: usize,
    /// Suppress progress output
    pub silent: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            silent: true,
        }
    }
}
