//! Per-size document assembly.
//!
//! For every page `P` of a code document the output gets
//! `[label first page, label second page, P, P]`, so an output always has four
//! times as many pages as its code document.

use crate::error::{Error, Result};
use crate::label::SizePagePair;
use crate::pdf::{PageSequenceWriter, PageTextSource, PdfSource};
use crate::sizes::Size;
use std::path::{Path, PathBuf};

/// Output pages produced per code page.
pub const PAGES_PER_CODE_PAGE: usize = 4;

/// A per-size output written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    /// Size the document was assembled for
    pub size: Size,
    /// Output path
    pub path: PathBuf,
    /// Pages written
    pub page_count: usize,
}

/// Interleaves label pages with code document pages.
#[derive(Debug)]
pub struct DocumentAssembler<'a> {
    label: &'a PdfSource,
}

impl<'a> DocumentAssembler<'a> {
    /// Assembler drawing label pages from `label`.
    pub fn new(label: &'a PdfSource) -> Self {
        Self { label }
    }

    /// Assemble `code` for `size` using the label pages in `pair` and write the
    /// result to `output`. Nothing is written on error.
    pub fn assemble(
        &self,
        code: &PdfSource,
        size: Size,
        pair: SizePagePair,
        output: &Path,
    ) -> Result<AssembledDocument> {
        let label_pages = self.label.page_count();
        for page in [pair.first, pair.second] {
            if page >= label_pages {
                return Err(Error::PageOutOfRange {
                    page,
                    count: label_pages,
                });
            }
        }
        if code.page_count() == 0 {
            return Err(Error::EmptyDocument(code.display_name()));
        }

        let mut writer = PageSequenceWriter::new();
        let label = writer.import(self.label)?;
        let codes = writer.import(code)?;

        for index in 0..codes.len() {
            writer.push_page(&label, pair.first)?;
            writer.push_page(&label, pair.second)?;
            writer.push_page(&codes, index)?;
            writer.push_page(&codes, index)?;
        }

        let page_count = writer.save(output)?;
        log::debug!(
            "Assembled {} ({} code pages, {} total)",
            output.display(),
            codes.len(),
            page_count
        );
        Ok(AssembledDocument {
            size,
            path: output.to_path_buf(),
            page_count,
        })
    }
}
