//! PDF page access and page-sequence output on top of `lopdf`.
//!
//! [`PdfSource`] is a read-only view of an input document. [`PageSequenceWriter`]
//! builds a new document from pages of any number of sources, in any order and
//! with repeats: each source is imported once (renumbered into the output's
//! object space) and every placement of a page gets its own page dictionary
//! sharing the imported content streams and resources.

use crate::error::{Error, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// Source of per-page text.
pub trait PageTextSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Text of the page at 0-based `index`.
    fn page_text(&self, index: usize) -> Result<String>;
}

/// A loaded input PDF.
#[derive(Debug, Clone)]
pub struct PdfSource {
    path: PathBuf,
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl PdfSource {
    /// Load a PDF from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path)?;
        let page_ids = doc.get_pages().into_values().collect();
        Ok(Self {
            path: path.to_path_buf(),
            doc,
            page_ids,
        })
    }

    /// Path the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for log messages.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl PageTextSource for PdfSource {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        if index >= self.page_ids.len() {
            return Err(Error::PageOutOfRange {
                page: index,
                count: self.page_ids.len(),
            });
        }
        // lopdf numbers pages from 1
        Ok(self.doc.extract_text(&[index as u32 + 1])?)
    }
}

/// Pages of one source, imported into a [`PageSequenceWriter`].
#[derive(Debug, Clone)]
pub struct ImportedPages {
    pages: Vec<Dictionary>,
}

impl ImportedPages {
    /// Number of imported pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the source had no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn page(&self, index: usize) -> Result<&Dictionary> {
        self.pages.get(index).ok_or(Error::PageOutOfRange {
            page: index,
            count: self.pages.len(),
        })
    }
}

/// Builds an output PDF page by page.
#[derive(Debug)]
pub struct PageSequenceWriter {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl Default for PageSequenceWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSequenceWriter {
    /// Start an empty document.
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Copy the objects of `source` into the output and return its pages,
    /// ready for placement. The source is left untouched.
    pub fn import(&mut self, source: &PdfSource) -> Result<ImportedPages> {
        let mut src = source.doc.clone();
        src.renumber_objects_with(self.doc.max_id + 1);

        let page_ids: Vec<ObjectId> = src.get_pages().into_values().collect();
        let mut pages = Vec::with_capacity(page_ids.len());
        for page_id in &page_ids {
            pages.push(resolve_page(&src, *page_id)?);
        }

        // Page tree nodes and the catalog are rebuilt for the output; page
        // dictionaries are re-added per placement.
        let mut skip: BTreeSet<ObjectId> = page_ids.into_iter().collect();
        for (id, object) in &src.objects {
            if let Object::Dictionary(dict) = object {
                if is_type(dict, b"Pages") || is_type(dict, b"Catalog") {
                    skip.insert(*id);
                }
            }
        }

        let max_id = src.max_id;
        for (id, object) in src.objects {
            if !skip.contains(&id) {
                self.doc.objects.insert(id, object);
            }
        }
        self.doc.max_id = self.doc.max_id.max(max_id);

        Ok(ImportedPages { pages })
    }

    /// Append page `index` of `imported` to the output.
    pub fn push_page(&mut self, imported: &ImportedPages, index: usize) -> Result<()> {
        let mut page = imported.page(index)?.clone();
        page.set("Parent", self.pages_id);
        let page_id = self.doc.add_object(page);
        self.kids.push(page_id.into());
        Ok(())
    }

    /// Append every page of `imported`, in order.
    pub fn push_all(&mut self, imported: &ImportedPages) -> Result<()> {
        for index in 0..imported.len() {
            self.push_page(imported, index)?;
        }
        Ok(())
    }

    /// Pages placed so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Finish the page tree and write the document to `path`.
    ///
    /// Returns the number of pages written.
    pub fn save(mut self, path: impl AsRef<Path>) -> Result<usize> {
        let count = self.kids.len();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        // Objects only reachable from the sources' catalogs (outlines, forms)
        // are dropped.
        self.doc.prune_objects();
        self.doc.compress();
        self.doc.save(path.as_ref())?;
        Ok(count)
    }
}

fn is_type(dict: &Dictionary, name: &[u8]) -> bool {
    matches!(dict.get(b"Type"), Ok(Object::Name(n)) if n.as_slice() == name)
}

/// Clone a page dictionary with inherited attributes made explicit and the
/// `Parent` link removed.
fn resolve_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            log::warn!("Page tree deeper than {} levels, stopping inheritance", MAX_TREE_DEPTH);
            break;
        }
        let node = match doc.get_dictionary(parent_id) {
            Ok(node) => node,
            Err(_) => break,
        };
        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    page.remove(b"Parent");
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::Stream;

    fn write_pdf(path: &Path, texts: &[&str]) {
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
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
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

    #[test]
    fn test_open_and_extract_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two.pdf");
        write_pdf(&path, &["Alpha", "Beta"]);

        let source = PdfSource::open(&path).unwrap();
        assert_eq!(source.page_count(), 2);
        assert_eq!(source.display_name(), "two.pdf");
        assert!(source.page_text(0).unwrap().contains("Alpha"));
        assert!(source.page_text(1).unwrap().contains("Beta"));
        assert!(matches!(source.page_text(2), Err(Error::PageOutOfRange { page: 2, count: 2 })));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(PdfSource::open("/nonexistent/missing.pdf").is_err());
    }

    #[test]
    fn test_writer_reorders_and_repeats_pages() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.pdf");
        write_pdf(&a, &["A0", "A1"]);
        write_pdf(&b, &["B0"]);

        let source_a = PdfSource::open(&a).unwrap();
        let source_b = PdfSource::open(&b).unwrap();

        let mut writer = PageSequenceWriter::new();
        let pages_a = writer.import(&source_a).unwrap();
        let pages_b = writer.import(&source_b).unwrap();
        writer.push_page(&pages_a, 1).unwrap();
        writer.push_page(&pages_b, 0).unwrap();
        writer.push_page(&pages_b, 0).unwrap();
        writer.push_all(&pages_a).unwrap();
        assert_eq!(writer.page_count(), 5);
        assert!(writer.push_page(&pages_b, 1).is_err());

        let out = dir.path().join("out.pdf");
        assert_eq!(writer.save(&out).unwrap(), 5);

        let result = PdfSource::open(&out).unwrap();
        let texts: Vec<String> = (0..result.page_count())
            .map(|i| result.page_text(i).unwrap())
            .collect();
        assert_eq!(texts.len(), 5);
        assert!(texts[0].contains("A1"));
        assert!(texts[1].contains("B0"));
        assert!(texts[2].contains("B0"));
        assert!(texts[3].contains("A0"));
        assert!(texts[4].contains("A1"));
    }

    #[test]
    fn test_inherited_attributes_are_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inherit.pdf");
        write_pdf(&path, &["X"]);

        let source = PdfSource::open(&path).unwrap();
        let mut writer = PageSequenceWriter::new();
        let imported = writer.import(&source).unwrap();
        let page = imported.page(0).unwrap();
        assert!(page.has(b"Resources"));
        assert!(page.has(b"MediaBox"));
        assert!(!page.has(b"Parent"));
    }

    #[test]
    fn test_sources_are_not_modified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("src.pdf");
        write_pdf(&path, &["Keep"]);
        let before = std::fs::read(&path).unwrap();

        let source = PdfSource::open(&path).unwrap();
        let mut writer = PageSequenceWriter::new();
        let imported = writer.import(&source).unwrap();
        writer.push_all(&imported).unwrap();
        writer.save(dir.path().join("copy.pdf")).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(source.page_count(), 1);
    }
}
