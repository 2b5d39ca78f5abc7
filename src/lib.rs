//! # pdfline - line search over PDF documents
//!
//! pdfline extracts the text of a PDF, splits every page into lines and
//! keeps the result in a single cache artifact on disk. The artifact is
//! keyed by a content fingerprint of the document, so an unchanged file is
//! never extracted twice.
//!
//! ## Architecture
//!
//! - [`index`] - Fingerprinting, per-page extraction and the cache artifact
//! - [`query`] - Literal substring search over the resident index
//! - [`session`] - Hash, cache check, reuse or rebuild, then search
//! - [`shell`] - The interactive prompt loop
//! - [`output`] - Result formatting (plain, highlighted or JSON lines)
//! - [`utils`] - Configuration, varint encoding and progress reporting
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdfline::index::{Extractor, IndexStore};
//! use pdfline::session::{Session, SessionOptions};
//! use std::path::Path;
//!
//! let store = IndexStore::new("pdf_index.bin");
//! let session = Session::open(
//!     Path::new("manual.pdf"),
//!     &store,
//!     &Extractor::default(),
//!     SessionOptions::default(),
//! )?;
//!
//! for m in session.search("warranty").matches() {
//!     println!("Page {}, Line {}: {}", m.record.page, m.record.line, m.record.text);
//! }
//! ```

pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod session;
pub mod shell;
pub mod utils;

pub use error::{Error, Result};
