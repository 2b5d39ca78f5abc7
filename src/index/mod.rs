pub mod extract;
pub mod hasher;
pub mod page_text;
pub mod stats;
pub mod store;
pub mod types;

pub use extract::{Extractor, IndexBuilder, PageSource, PdfDocument};
pub use hasher::{fingerprint_bytes, fingerprint_file};
pub use store::IndexStore;
pub use types::*;
