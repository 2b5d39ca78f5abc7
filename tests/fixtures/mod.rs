//! PDF documents generated on the fly for integration tests

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::Path;

/// Page 1 and page 2 of the two-page sample document
pub const SAMPLE_PAGES: [&str; 2] = ["Hello world\nFoo bar", "world peace\nBar none"];

/// Write a PDF with one page per entry of `pages`.
///
/// Every line of a page becomes its own text block.
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let contents: Vec<Vec<Operation>> = pages
        .iter()
        .map(|text| {
            text.lines()
                .enumerate()
                .flat_map(|(i, line)| {
                    vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), (720 - 16 * i as i64).into()]),
                        Operation::new("Tj", vec![Object::string_literal(line)]),
                        Operation::new("ET", vec![]),
                    ]
                })
                .collect()
        })
        .collect();
    write_content_pages(path, contents);
}

/// Lines a typesetter would emit: several lines per text block, moved with
/// `T*`, `'`, `"`, `Td` and `TD`, and a kerned `TJ` array.
pub fn write_flowing_sample(path: &Path) {
    let page_one = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("TL", vec![14.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
        Operation::new("Tj", vec![Object::string_literal("Hello world")]),
        Operation::new("T*", vec![]),
        Operation::new(
            "TJ",
            vec![Object::Array(vec![
                Object::string_literal("Fo"),
                (-15).into(),
                Object::string_literal("o"),
                (-250).into(),
                Object::string_literal("bar"),
            ])],
        ),
        Operation::new("'", vec![Object::string_literal("Third line")]),
        Operation::new("Td", vec![0.into(), (-28).into()]),
        Operation::new("Tj", vec![Object::string_literal("After gap")]),
        Operation::new("ET", vec![]),
    ];
    let page_two = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
        Operation::new("Tj", vec![Object::string_literal("world peace")]),
        Operation::new("TD", vec![0.into(), (-14).into()]),
        Operation::new("Tj", vec![Object::string_literal("Bar")]),
        Operation::new("Td", vec![30.into(), 0.into()]),
        Operation::new("Tj", vec![Object::string_literal("none")]),
        Operation::new("\"", vec![0.into(), 0.into(), Object::string_literal("last line")]),
        Operation::new("ET", vec![]),
    ];
    write_content_pages(path, vec![page_one, page_two]);
}

/// Write a PDF whose pages carry the given content operations
pub fn write_content_pages(path: &Path, pages: Vec<Vec<Operation>>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// The two-page sample document
pub fn write_sample(path: &Path) {
    write_pdf(path, &SAMPLE_PAGES);
}
