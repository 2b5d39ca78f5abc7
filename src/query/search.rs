use crate::index::types::{Index, LineRecord};
use memchr::memmem::Finder;
use serde::Serialize;
use std::ops::Range;

/// A line that contains the query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch<'a> {
    #[serde(flatten)]
    pub record: &'a LineRecord,
    /// Byte offset of the first occurrence in `record.text`
    pub match_start: usize,
    /// Byte offset just past the first occurrence
    pub match_end: usize,
}

impl SearchMatch<'_> {
    pub fn range(&self) -> Range<usize> {
        self.match_start..self.match_end
    }
}

/// Literal, case-sensitive substring scan over an index.
///
/// Results keep index order. The empty query matches every line.
pub fn search<'a>(index: &'a Index, query: &str) -> Vec<SearchMatch<'a>> {
    let finder = Finder::new(query.as_bytes());
    let needle_len = query.len();

    index
        .iter()
        .filter_map(|record| {
            finder.find(record.text.as_bytes()).map(|start| SearchMatch {
                record,
                match_start: start,
                match_end: start + needle_len,
            })
        })
        .collect()
}

impl Index {
    /// See [`search`]
    pub fn search(&self, query: &str) -> Vec<SearchMatch<'_>> {
        search(self, query)
    }
}
