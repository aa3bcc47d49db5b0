//! Input discovery and label selection.

use crate::config::LabelSelection;
use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    /// File names that conventionally identify a label document
    static ref RE_LABEL_NAME: Regex =
        Regex::new(r"(?i)(тикетка|этикетка|все\s*размеры|label)").unwrap();
}

/// Folder created by macOS archivers next to the real content.
const RESOURCE_FORK_DIR: &str = "__MACOSX";

/// An input PDF found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    /// Full path
    pub path: PathBuf,
    /// File name including extension
    pub file_name: String,
    /// Size on disk in bytes
    pub byte_size: u64,
}

/// Recursively find PDF documents under `dir`.
///
/// Hidden entries and resource-fork folders are skipped. The result is sorted
/// by file name, then by path.
pub fn discover_inputs(dir: &Path) -> Result<Vec<InputDocument>> {
    let mut documents = Vec::new();
    collect_pdfs(dir, &mut documents)?;
    documents.sort_by(|a, b| {
        a.file_name
            .cmp(&b.file_name)
            .then_with(|| a.path.cmp(&b.path))
    });
    Ok(documents)
}

fn collect_pdfs(dir: &Path, documents: &mut Vec<InputDocument>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') || file_name == RESOURCE_FORK_DIR {
            continue;
        }

        let path = entry.path();
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            collect_pdfs(&path, documents)?;
        } else if metadata.is_file() && has_pdf_extension(&path) {
            documents.push(InputDocument {
                path,
                file_name,
                byte_size: metadata.len(),
            });
        }
    }
    Ok(())
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Policy choosing the label among the discovered inputs.
pub trait LabelSelector {
    /// Index of the label in `candidates`, or `None` when nothing qualifies.
    fn select(&self, candidates: &[InputDocument]) -> Option<usize>;

    /// Short description for log messages.
    fn describe(&self) -> String;
}

/// Picks the largest file. Ties go to the earliest candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestFile;

impl LabelSelector for LargestFile {
    fn select(&self, candidates: &[InputDocument]) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (index, doc) in candidates.iter().enumerate() {
            match best {
                Some((_, size)) if size >= doc.byte_size => {},
                _ => best = Some((index, doc.byte_size)),
            }
        }
        best.map(|(index, _)| index)
    }

    fn describe(&self) -> String {
        "largest file".to_string()
    }
}

/// Picks the first candidate whose file name matches a pattern.
#[derive(Debug, Clone)]
pub struct NamePattern {
    pattern: Regex,
}

impl NamePattern {
    /// Match file names against `pattern`.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            Error::InvalidConfig(format!("invalid label name pattern '{}': {}", pattern, e))
        })?;
        Ok(Self { pattern })
    }

    /// The conventional label keywords (`этикетка`, `все размеры`, `label`).
    pub fn label_keywords() -> Self {
        Self {
            pattern: RE_LABEL_NAME.clone(),
        }
    }
}

impl LabelSelector for NamePattern {
    fn select(&self, candidates: &[InputDocument]) -> Option<usize> {
        candidates
            .iter()
            .position(|doc| self.pattern.is_match(&doc.file_name))
    }

    fn describe(&self) -> String {
        format!("file name matching '{}'", self.pattern.as_str())
    }
}

/// Build the selector for a configured rule.
pub fn selector_for(selection: &LabelSelection) -> Result<Box<dyn LabelSelector>> {
    Ok(match selection {
        LabelSelection::LargestFile => Box::new(LargestFile),
        LabelSelection::NamePattern(pattern) => Box::new(NamePattern::new(pattern)?),
    })
}
