#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfline::index::{Index, LineRecord};

fuzz_target!(|input: (Vec<String>, String)| {
    let (lines, query) = input;
    let index = Index::new(
        lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| LineRecord::new(1, i as u32 + 1, text))
            .collect(),
    );

    let matches = index.search(&query);
    let expected = index.iter().filter(|r| r.text.contains(query.as_str())).count();
    assert_eq!(matches.len(), expected);
    for m in &matches {
        assert_eq!(&m.record.text[m.range()], query);
    }
});
