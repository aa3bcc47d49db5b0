//! The all-sizes document.

use crate::assembler::AssembledDocument;
use crate::error::Result;
use crate::pdf::{PageSequenceWriter, PdfSource};
use crate::run_log::RunLog;
use crate::sizes::SizeRegistry;
use std::path::Path;

/// Concatenates per-size outputs in canonical size order.
#[derive(Debug, Clone)]
pub struct CombinedBuilder {
    registry: SizeRegistry,
}

impl CombinedBuilder {
    /// Builder ordering by `registry`.
    pub fn new(registry: SizeRegistry) -> Self {
        Self { registry }
    }

    /// Order `documents` by canonical size. Documents of the same size keep
    /// their relative order; sizes outside the catalog are left out.
    pub fn ordered<'d>(&self, documents: &'d [AssembledDocument]) -> Vec<&'d AssembledDocument> {
        self.registry
            .canonical_order()
            .iter()
            .flat_map(|size| documents.iter().filter(move |d| d.size == *size))
            .collect()
    }

    /// Write the combined document to `output`.
    ///
    /// Returns `Ok(None)` without writing anything when `documents` is empty,
    /// otherwise the number of pages written.
    pub fn build(
        &self,
        documents: &[AssembledDocument],
        output: &Path,
        log: &mut RunLog,
    ) -> Result<Option<usize>> {
        if documents.is_empty() {
            return Ok(None);
        }

        let mut writer = PageSequenceWriter::new();
        for document in self.ordered(documents) {
            let source = PdfSource::open(&document.path)?;
            let pages = writer.import(&source)?;
            writer.push_all(&pages)?;
            log.info(format!("  + {}", source.display_name()));
        }

        Ok(Some(writer.save(output)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn assembled(size: u32, name: &str) -> AssembledDocument {
        AssembledDocument {
            size,
            path: PathBuf::from(name),
            page_count: 4,
        }
    }

    #[test]
    fn test_ordered_by_canonical_size() {
        let docs = vec![
            assembled(50, "c_50.pdf"),
            assembled(42, "z_42.pdf"),
            assembled(46, "a_46.pdf"),
            assembled(42, "b_42.pdf"),
        ];
        let builder = CombinedBuilder::new(SizeRegistry::default());
        let order: Vec<&str> = builder
            .ordered(&docs)
            .iter()
            .map(|d| d.path.to_str().unwrap())
            .collect();
        assert_eq!(order, vec!["z_42.pdf", "b_42.pdf", "a_46.pdf", "c_50.pdf"]);
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("all.pdf");
        let builder = CombinedBuilder::new(SizeRegistry::default());
        let mut log = RunLog::new();

        assert_eq!(builder.build(&[], &output, &mut log).unwrap(), None);
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let builder = CombinedBuilder::new(SizeRegistry::default());
        let mut log = RunLog::new();
        let docs = vec![assembled(42, "/nonexistent/a_42.pdf")];
        assert!(builder.build(&docs, &dir.path().join("all.pdf"), &mut log).is_err());
    }
}
