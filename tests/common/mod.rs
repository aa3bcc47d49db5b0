//! PDF fixtures for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

/// Write a PDF with one page per entry of `texts`, each showing that text.
///
/// Font and media box live on the page tree root, so copied pages must
/// inherit them to stay readable.
pub fn write_pdf(path: &Path, texts: &[String]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                Operation::new("ET", vec![]),
            ],
        };
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
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Label with two marked pages per size, `Size: <n>` on each, so size `i`
/// (0-based position in `sizes`) sits on pages `2i` and `2i + 1`.
///
/// Pages are padded with filler text so the label is the largest input.
pub fn write_label(path: &Path, sizes: &[u32]) {
    let filler = "x".repeat(300);
    let mut texts = Vec::new();
    for size in sizes {
        texts.push(format!("Product Size: {} {}", size, filler));
        texts.push(format!("Package Size: {} {}", size, filler));
    }
    write_pdf(path, &texts);
}

/// Code document whose pages read `CODE <tag> <n>`.
pub fn write_code(path: &Path, tag: &str, pages: usize) {
    let texts: Vec<String> = (1..=pages).map(|n| format!("CODE {} {}", tag, n)).collect();
    write_pdf(path, &texts);
}

/// Text of every page of the PDF at `path`.
pub fn page_texts(path: &Path) -> Vec<String> {
    let doc = Document::load(path).unwrap();
    let count = doc.get_pages().len() as u32;
    (1..=count)
        .map(|n| doc.extract_text(&[n]).unwrap_or_default())
        .collect()
}
