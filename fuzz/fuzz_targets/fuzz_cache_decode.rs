#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfline::index::store::{decode_entry, encode_entry};

fuzz_target!(|data: &[u8]| {
    // Arbitrary artifact bytes must decode or fail, never panic
    if let Ok(entry) = decode_entry(data) {
        let reencoded = encode_entry(&entry);
        assert_eq!(decode_entry(&reencoded).ok(), Some(entry));
    }
});
