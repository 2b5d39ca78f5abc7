//! The on-disk cache artifact.
//!
//! Exactly one (fingerprint, index) pair lives in the artifact. Both halves
//! are encoded into one buffer and moved into place with a rename, so the
//! stored fingerprint always describes the stored index.
//!
//! Layout (little-endian, varints for integers):
//!
//! ```text
//! magic        "PDLX"
//! version      u32
//! fingerprint  varint len, utf-8 bytes
//! count        varint
//! record*      varint page, varint line, varint len, utf-8 bytes
//! ```

use crate::error::{Error, Result};
use crate::index::types::{CacheEntry, Fingerprint, Index, LineRecord};
use crate::utils::{SliceReader, encode_varint, encode_varint_u64};
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const MAGIC: &[u8; 4] = b"PDLX";

/// Current artifact format version
pub const FORMAT_VERSION: u32 = 1;

/// Why a buffer could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    BadMagic,
    UnsupportedVersion(u32),
    Malformed(String),
}

impl DecodeError {
    fn malformed(what: impl Into<String>) -> Self {
        DecodeError::Malformed(what.into())
    }

    fn into_error(self, path: &Path) -> Error {
        match self {
            DecodeError::BadMagic => Error::CacheCorrupt {
                path: path.to_path_buf(),
                reason: "not a pdfline cache artifact".to_string(),
            },
            DecodeError::UnsupportedVersion(found) => Error::CacheVersion {
                path: path.to_path_buf(),
                found,
                expected: FORMAT_VERSION,
            },
            DecodeError::Malformed(reason) => Error::CacheCorrupt {
                path: path.to_path_buf(),
                reason,
            },
        }
    }
}

/// Encode a cache entry into the artifact format
pub fn encode_entry(entry: &CacheEntry) -> Vec<u8> {
    let text_bytes: usize = entry.index.iter().map(|r| r.text.len()).sum();
    let mut buf = Vec::with_capacity(16 + entry.fingerprint.as_str().len() + text_bytes + entry.index.len() * 4);

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());

    let fingerprint = entry.fingerprint.as_str().as_bytes();
    encode_varint_u64(fingerprint.len() as u64, &mut buf);
    buf.extend_from_slice(fingerprint);

    encode_varint_u64(entry.index.len() as u64, &mut buf);
    for record in &entry.index {
        encode_varint(record.page, &mut buf);
        encode_varint(record.line, &mut buf);
        encode_varint_u64(record.text.len() as u64, &mut buf);
        buf.extend_from_slice(record.text.as_bytes());
    }

    buf
}

/// Decode an artifact buffer. Any deviation from the layout is an error.
pub fn decode_entry(buf: &[u8]) -> std::result::Result<CacheEntry, DecodeError> {
    let mut reader = SliceReader::new(buf);

    if reader.take(MAGIC.len()) != Some(&MAGIC[..]) {
        return Err(DecodeError::BadMagic);
    }

    let version = reader
        .u32_le()
        .ok_or_else(|| DecodeError::malformed("truncated header"))?;
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let fingerprint = read_string(&mut reader, "fingerprint")?;

    let count = reader
        .varint_u64()
        .ok_or_else(|| DecodeError::malformed("truncated record count"))?;
    // Each record needs at least 3 bytes, so a larger count cannot be honest
    if count > (reader.remaining() / 3) as u64 {
        return Err(DecodeError::malformed(format!(
            "record count {count} exceeds artifact size"
        )));
    }

    let mut records = Vec::with_capacity(count as usize);
    for n in 0..count {
        let page = reader
            .varint_u32()
            .ok_or_else(|| DecodeError::malformed(format!("record {n}: bad page number")))?;
        let line = reader
            .varint_u32()
            .ok_or_else(|| DecodeError::malformed(format!("record {n}: bad line number")))?;
        if page == 0 || line == 0 {
            return Err(DecodeError::malformed(format!(
                "record {n}: page and line numbers are 1-based"
            )));
        }
        let text = read_string(&mut reader, "line text")?;
        records.push(LineRecord { page, line, text });
    }

    if reader.remaining() != 0 {
        return Err(DecodeError::malformed(format!(
            "{} trailing bytes after record {}",
            reader.remaining(),
            count
        )));
    }

    Ok(CacheEntry::new(
        Fingerprint::from_hex(fingerprint),
        Index::new(records),
    ))
}

fn read_string(reader: &mut SliceReader<'_>, what: &str) -> std::result::Result<String, DecodeError> {
    let at = reader.position();
    let len = reader
        .varint_u64()
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(|| DecodeError::malformed(format!("bad {what} length at byte {at}")))?;
    let bytes = reader
        .take(len)
        .ok_or_else(|| DecodeError::malformed(format!("truncated {what} at byte {at}")))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| DecodeError::malformed(format!("{what} at byte {at} is not UTF-8")))
}

/// Reads and writes the single cache artifact at a configured path
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `entry`, replacing whatever artifact was there
    pub fn save(&self, entry: &CacheEntry) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let tmp_path = self.tmp_path();
        let encoded = encode_entry(entry);

        let write = || -> io::Result<()> {
            let mut file = BufWriter::new(File::create(&tmp_path)?);
            file.write_all(&encoded)?;
            file.flush()?;
            file.get_ref().sync_all()?;
            Ok(())
        };

        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::io(&tmp_path, e));
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            Error::io(&self.path, e)
        })?;

        debug!(
            path = %self.path.display(),
            bytes = encoded.len(),
            records = entry.index.len(),
            "saved cache artifact"
        );
        Ok(())
    }

    /// Load the stored entry. A missing artifact is `Ok(None)`.
    pub fn load(&self) -> Result<Option<CacheEntry>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache artifact");
                return Ok(None);
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let len = file.metadata().map_err(|e| Error::io(&self.path, e))?.len();
        if len == 0 {
            return Err(DecodeError::malformed("empty file").into_error(&self.path));
        }

        // SAFETY: the artifact is only replaced by rename, never truncated in place
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::io(&self.path, e))?;
        let entry = decode_entry(&mmap).map_err(|e| e.into_error(&self.path))?;

        debug!(
            path = %self.path.display(),
            records = entry.index.len(),
            "loaded cache artifact"
        );
        Ok(Some(entry))
    }

    /// Delete the artifact. Returns whether one existed.
    pub fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    /// Size of the artifact in bytes, if present
    pub fn size(&self) -> Result<Option<u64>> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::hasher::fingerprint_bytes;
    use tempfile::TempDir;

    fn sample_entry(records: usize) -> CacheEntry {
        let index: Vec<LineRecord> = (0..records)
            .map(|i| {
                LineRecord::new(
                    (i / 40) as u32 + 1,
                    (i % 40) as u32 + 1,
                    if i % 7 == 0 { String::new() } else { format!("line {i} ünïcode ✓") },
                )
            })
            .collect();
        CacheEntry::new(fingerprint_bytes(format!("doc {records}").as_bytes()), Index::new(index))
    }

    #[test]
    fn test_save_then_load_returns_same_entry() {
        let dir = TempDir::new().unwrap();
        let store = IndexStore::new(dir.path().join("pdf_index.bin"));

        for records in [0, 1, 250, 20_000] {
            let entry = sample_entry(records);
            store.save(&entry).unwrap();
            assert_eq!(store.load().unwrap(), Some(entry), "{records} records");
        }
    }

    #[test]
    fn test_missing_artifact_is_no_cache() {
        let dir = TempDir::new().unwrap();
        let store = IndexStore::new(dir.path().join("pdf_index.bin"));
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.size().unwrap(), None);
    }

    #[test]
    fn test_save_overwrites_previous_entry() {
        let dir = TempDir::new().unwrap();
        let store = IndexStore::new(dir.path().join("pdf_index.bin"));

        store.save(&sample_entry(500)).unwrap();
        let second = sample_entry(3);
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), Some(second));
        assert!(!dir.path().join("pdf_index.bin.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = IndexStore::new(dir.path().join("a").join("b").join("idx.bin"));
        store.save(&sample_entry(2)).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_unwritable_location_is_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        // Parent is a regular file, so nothing can be created beneath it
        let store = IndexStore::new(blocker.join("idx.bin"));
        assert!(matches!(store.save(&sample_entry(1)), Err(Error::Io { .. })));
    }

    #[test]
    fn test_garbage_artifact_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pdf_index.bin");
        fs::write(&path, b"\x80\x04\x95pickled-looking bytes").unwrap();

        let err = IndexStore::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::CacheCorrupt { .. }));
    }

    #[test]
    fn test_empty_artifact_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pdf_index.bin");
        fs::write(&path, b"").unwrap();
        assert!(IndexStore::new(&path).load().unwrap_err().is_cache_corruption());
    }

    #[test]
    fn test_truncated_artifact_is_corrupt() {
        let encoded = encode_entry(&sample_entry(50));
        for cut in [5, 9, encoded.len() / 2, encoded.len() - 1] {
            assert!(decode_entry(&encoded[..cut]).is_err(), "cut at {cut}");
        }
    }

    #[test]
    fn test_trailing_bytes_are_corrupt() {
        let mut encoded = encode_entry(&sample_entry(3));
        encoded.push(0);
        assert!(matches!(decode_entry(&encoded), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_future_version_is_version_error() {
        let mut encoded = encode_entry(&sample_entry(3));
        encoded[4..8].copy_from_slice(&7u32.to_le_bytes());
        assert_eq!(decode_entry(&encoded), Err(DecodeError::UnsupportedVersion(7)));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pdf_index.bin");
        fs::write(&path, &encoded).unwrap();
        match IndexStore::new(&path).load().unwrap_err() {
            Error::CacheVersion { found, expected, .. } => {
                assert_eq!(found, 7);
                assert_eq!(expected, FORMAT_VERSION);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_line_number_is_corrupt() {
        let entry = CacheEntry::new(
            fingerprint_bytes(b"x"),
            Index::new(vec![LineRecord::new(1, 0, "bad")]),
        );
        assert!(decode_entry(&encode_entry(&entry)).is_err());
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let store = IndexStore::new(dir.path().join("pdf_index.bin"));
        assert!(!store.remove().unwrap());
        store.save(&sample_entry(1)).unwrap();
        assert!(store.remove().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }
}
