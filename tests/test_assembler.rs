//! Integration tests for per-size assembly and the combined document.

mod common;

use common::{page_texts, write_code, write_label};
use label_assembler::assembler::{AssembledDocument, DocumentAssembler, PAGES_PER_CODE_PAGE};
use label_assembler::combined::CombinedBuilder;
use label_assembler::error::Error;
use label_assembler::label::SizePagePair;
use label_assembler::pdf::{PageTextSource, PdfSource};
use label_assembler::run_log::RunLog;
use label_assembler::sizes::SizeRegistry;
use std::path::Path;
use tempfile::tempdir;

fn assemble(dir: &Path, label: &PdfSource, tag: &str, size: u32, pair: SizePagePair, pages: usize) -> AssembledDocument {
    let code_path = dir.join(format!("code {}.pdf", tag));
    write_code(&code_path, tag, pages);
    let code = PdfSource::open(&code_path).unwrap();
    let output = dir.join(format!("out_{}.pdf", tag));
    DocumentAssembler::new(label)
        .assemble(&code, size, pair, &output)
        .unwrap()
}

mod assembler_tests {
    use super::*;

    #[test]
    fn test_interleaves_label_and_code_pages() {
        let dir = tempdir().unwrap();
        let label_path = dir.path().join("label.pdf");
        write_label(&label_path, &[42, 44]);
        let label = PdfSource::open(&label_path).unwrap();

        let pair = SizePagePair { first: 2, second: 3 };
        let result = assemble(dir.path(), &label, "44", 44, pair, 2);

        assert_eq!(result.size, 44);
        assert_eq!(result.page_count, 8);

        let texts = page_texts(&result.path);
        assert_eq!(texts.len(), 8);
        for (block, code_page) in texts.chunks(4).zip(1..) {
            assert!(block[0].contains("Product Size: 44"));
            assert!(block[1].contains("Package Size: 44"));
            assert!(block[2].contains(&format!("CODE 44 {}", code_page)));
            assert!(block[3].contains(&format!("CODE 44 {}", code_page)));
        }
    }

    #[test]
    fn test_page_count_is_four_times_code_pages() {
        let dir = tempdir().unwrap();
        let label_path = dir.path().join("label.pdf");
        write_label(&label_path, &[42]);
        let label = PdfSource::open(&label_path).unwrap();
        let pair = SizePagePair { first: 0, second: 1 };

        for pages in [1, 3, 5] {
            let result = assemble(dir.path(), &label, &format!("n{}", pages), 42, pair, pages);
            assert_eq!(result.page_count, PAGES_PER_CODE_PAGE * pages);
            assert_eq!(PdfSource::open(&result.path).unwrap().page_count(), 4 * pages);
        }
    }

    #[test]
    fn test_label_pair_out_of_range() {
        let dir = tempdir().unwrap();
        let label_path = dir.path().join("label.pdf");
        write_label(&label_path, &[42]);
        let label = PdfSource::open(&label_path).unwrap();

        let code_path = dir.path().join("code.pdf");
        write_code(&code_path, "42", 1);
        let code = PdfSource::open(&code_path).unwrap();
        let output = dir.path().join("out.pdf");

        let err = DocumentAssembler::new(&label)
            .assemble(&code, 42, SizePagePair { first: 1, second: 2 }, &output)
            .unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange { page: 2, count: 2 }));
        assert!(!output.exists());
    }

    #[test]
    fn test_inputs_are_not_modified() {
        let dir = tempdir().unwrap();
        let label_path = dir.path().join("label.pdf");
        write_label(&label_path, &[42]);
        let label_bytes = std::fs::read(&label_path).unwrap();
        let label = PdfSource::open(&label_path).unwrap();

        assemble(dir.path(), &label, "42", 42, SizePagePair { first: 0, second: 1 }, 2);

        assert_eq!(std::fs::read(&label_path).unwrap(), label_bytes);
        assert_eq!(label.page_count(), 2);
    }
}

mod combined_tests {
    use super::*;

    #[test]
    fn test_combined_follows_canonical_order() {
        let dir = tempdir().unwrap();
        let label_path = dir.path().join("label.pdf");
        write_label(&label_path, &[42, 44, 46]);
        let label = PdfSource::open(&label_path).unwrap();

        // Created out of order on purpose
        let documents = vec![
            assemble(dir.path(), &label, "46", 46, SizePagePair { first: 4, second: 5 }, 1),
            assemble(dir.path(), &label, "42", 42, SizePagePair { first: 0, second: 1 }, 2),
            assemble(dir.path(), &label, "44", 44, SizePagePair { first: 2, second: 3 }, 1),
        ];

        let output = dir.path().join("all.pdf");
        let mut log = RunLog::new();
        let pages = CombinedBuilder::new(SizeRegistry::default())
            .build(&documents, &output, &mut log)
            .unwrap();
        assert_eq!(pages, Some(16));

        let texts = page_texts(&output);
        assert_eq!(texts.len(), 16);
        assert!(texts[0].contains("Size: 42"));
        assert!(texts[2].contains("CODE 42 1"));
        assert!(texts[6].contains("CODE 42 2"));
        assert!(texts[8].contains("Size: 44"));
        assert!(texts[12].contains("Size: 46"));
        assert!(texts[15].contains("CODE 46 1"));
        assert!(log.text().contains("+ out_42.pdf"));
    }
}
