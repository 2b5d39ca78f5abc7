use crate::error::{Error, Result};
use crate::index::types::{Index, IndexConfig, LineNumber, LineRecord, PageNumber};
use crate::index::page_text::{page_encodings, page_lines};
use crate::utils::num_cpus;
use crate::utils::progress::page_progress;
use lopdf::{Document, ObjectId};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// A paginated text source. Pages are addressed by 0-based index.
pub trait PageSource: Sync {
    fn page_count(&self) -> usize;

    /// Plain text of one page. Errors should name the 1-based page.
    fn page_text(&self, page_index: usize) -> Result<String>;
}

/// Anything that can turn a document path into an [`Index`]
pub trait IndexBuilder {
    fn build_index(&self, document: &Path) -> Result<Index>;
}

/// A PDF opened with lopdf
pub struct PdfDocument {
    document: Document,
    /// Page objects in page order, resolved once at open
    pages: Vec<ObjectId>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let document = Document::load(path).map_err(|e| Error::DocumentOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let pages = document.page_iter().collect();

        Ok(Self { document, pages })
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page_index: usize) -> Result<String> {
        let page = page_index as PageNumber + 1;
        let page_id = *self.pages.get(page_index).ok_or_else(|| Error::PageExtraction {
            page,
            reason: "page does not exist".to_string(),
        })?;

        let content = self
            .document
            .get_and_decode_page_content(page_id)
            .map_err(|e| Error::PageExtraction {
                page,
                reason: e.to_string(),
            })?;
        let encodings = page_encodings(&self.document, page_id);
        Ok(page_lines(&content.operations, &encodings))
    }
}

/// Split page text on newline boundaries.
/// Interior blank lines are kept; a trailing newline adds no empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
}

/// Extract the line records of a single page (computed in parallel)
pub fn page_records<S: PageSource + ?Sized>(source: &S, page_index: usize) -> Result<Vec<LineRecord>> {
    let page = page_index as PageNumber + 1;
    let text = source.page_text(page_index)?;

    Ok(split_lines(&text)
        .enumerate()
        .map(|(i, line)| LineRecord::new(page, i as LineNumber + 1, line))
        .collect())
}

/// Concurrent per-page extractor.
///
/// Pages are fanned out over a bounded worker pool and reassembled in page
/// order before returning, so callers see a plain synchronous call whose
/// result equals page-by-page sequential extraction.
pub struct Extractor {
    config: IndexConfig,
}

impl Extractor {
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    /// Open a PDF and extract all of its lines
    pub fn extract(&self, path: &Path) -> Result<Index> {
        let document = PdfDocument::open(path)?;
        self.extract_source(&document)
    }

    /// Extract all lines of an already opened source
    pub fn extract_source<S: PageSource + ?Sized>(&self, source: &S) -> Result<Index> {
        let started = Instant::now();
        let page_count = source.page_count();
        let threads = self.worker_threads();
        debug!(page_count, threads, "starting extraction");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pdfline-extract-{i}"))
            .build()
            .map_err(|e| Error::WorkerPool(e.to_string()))?;

        let progress_bar = page_progress(page_count, self.config.silent);
        let pb_clone = progress_bar.clone();

        // Result collection keeps input order and stops at the first failed page
        let pages: Result<Vec<Vec<LineRecord>>> = pool.install(|| {
            (0..page_count)
                .into_par_iter()
                .map(|page_index| {
                    let records = page_records(source, page_index);
                    if let Some(ref pb) = pb_clone {
                        pb.inc(1);
                    }
                    records
                })
                .collect()
        });

        let pages = match pages {
            Ok(pages) => pages,
            Err(e) => {
                if let Some(pb) = progress_bar {
                    pb.finish_and_clear();
                }
                return Err(e);
            }
        };

        let records: Vec<LineRecord> = pages.into_iter().flatten().collect();

        if let Some(pb) = progress_bar {
            pb.finish_with_message(format!("{} lines", records.len()));
        }

        info!(
            pages = page_count,
            lines = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "extracted document"
        );
        Ok(Index::new(records))
    }

    fn worker_threads(&self) -> usize {
        if self.config.worker_threads == 0 {
            num_cpus()
        } else {
            self.config.worker_threads
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

impl IndexBuilder for Extractor {
    fn build_index(&self, document: &Path) -> Result<Index> {
        self.extract(document)
    }
}

/// In-memory page source, one string per page
#[derive(Debug, Clone, Default)]
pub struct TextPages {
    pages: Vec<String>,
}

impl TextPages {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }
}

impl PageSource for TextPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page_index: usize) -> Result<String> {
        self.pages
            .get(page_index)
            .cloned()
            .ok_or_else(|| Error::PageExtraction {
                page: page_index as PageNumber + 1,
                reason: "page does not exist".to_string(),
            })
    }
}
