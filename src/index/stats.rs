use crate::index::store::{FORMAT_VERSION, IndexStore};
use crate::index::types::CacheEntry;
use anyhow::{Context, Result};
use std::io::Write;

/// Summary of what the cache artifact holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub fingerprint: String,
    pub pages: usize,
    pub lines: usize,
    pub blank_lines: usize,
    pub size_bytes: u64,
}

impl CacheStats {
    pub fn from_entry(entry: &CacheEntry, size_bytes: u64) -> Self {
        Self {
            fingerprint: entry.fingerprint.to_string(),
            pages: entry.index.page_count(),
            lines: entry.index.len(),
            blank_lines: entry.index.iter().filter(|r| r.text.is_empty()).count(),
            size_bytes,
        }
    }
}

/// Display cache artifact statistics
pub fn show_stats<W: Write>(store: &IndexStore, out: &mut W) -> Result<()> {
    let location = store.path().display();

    let Some(entry) = store.load().context("Failed to read cache artifact")? else {
        writeln!(out, "No cache artifact at {}", location)?;
        return Ok(());
    };
    let size = store.size()?.unwrap_or(0);
    let stats = CacheStats::from_entry(&entry, size);

    writeln!(out, "Cache Statistics")?;
    writeln!(out, "================")?;
    writeln!(out)?;
    writeln!(out, "Cache location:   {}", location)?;
    writeln!(out, "Format version:   {}", FORMAT_VERSION)?;
    writeln!(out, "Fingerprint:      {}", stats.fingerprint)?;
    writeln!(out, "Pages with text:  {}", stats.pages)?;
    writeln!(out, "Lines:            {}", stats.lines)?;
    writeln!(out, "Blank lines:      {}", stats.blank_lines)?;
    writeln!(out, "Cache size:       {}", format_size(stats.size_bytes))?;

    Ok(())
}

/// Format byte size to human readable
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
