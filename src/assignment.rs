//! Binding code documents to sizes.
//!
//! A size parsed from the file name always wins. Documents without one are
//! assigned by position only when the counts leave no room for doubt: the run
//! holds exactly one document per catalog size, at least one of them parsed,
//! and the unparsed documents exactly fill the sizes nobody parsed. They are
//! then matched in order, sorted by file name against sorted sizes. Anything
//! else is reported and skipped.

use crate::label::SizePageMap;
use crate::name_parser::CodeName;
use crate::run_log::RunLog;
use crate::sizes::{Size, SizeRegistry};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A code document with its parsed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDocument {
    /// Location on disk
    pub path: PathBuf,
    /// File name including extension
    pub file_name: String,
    /// Article, color and size parsed from the file name
    pub name: CodeName,
}

/// Final size binding of one code document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Size taken from the file name
    Parsed(Size),
    /// Size assigned by position
    Fallback(Size),
    /// No size could be determined; the document is skipped
    Unresolved,
}

impl Assignment {
    /// The bound size, if any.
    pub fn size(&self) -> Option<Size> {
        match self {
            Assignment::Parsed(size) | Assignment::Fallback(size) => Some(*size),
            Assignment::Unresolved => None,
        }
    }
}

/// Decides the size of every code document in a run.
#[derive(Debug, Clone)]
pub struct AssignmentResolver {
    registry: SizeRegistry,
}

impl AssignmentResolver {
    /// Resolver over `registry`.
    pub fn new(registry: SizeRegistry) -> Self {
        Self { registry }
    }

    /// Catalog sizes the label does not cover.
    pub fn missing_sizes(&self, label_pairs: &SizePageMap) -> Vec<Size> {
        self.registry
            .canonical_order()
            .iter()
            .copied()
            .filter(|size| !label_pairs.contains_key(size))
            .collect()
    }

    /// Catalog sizes no document parsed.
    pub fn unparsed_sizes(&self, documents: &[CodeDocument]) -> Vec<Size> {
        let parsed: BTreeSet<Size> = documents.iter().filter_map(|d| d.name.size).collect();
        self.registry
            .canonical_order()
            .iter()
            .copied()
            .filter(|size| !parsed.contains(size))
            .collect()
    }

    /// Whether positional assignment applies to `documents`.
    pub fn fallback_eligible(&self, documents: &[CodeDocument]) -> bool {
        let unresolved = documents.iter().filter(|d| d.name.size.is_none()).count();
        let resolved = documents.len() - unresolved;

        unresolved > 0
            && resolved > 0
            && documents.len() == self.registry.len()
            && unresolved == self.unparsed_sizes(documents).len()
    }

    /// One assignment per document, in the order of `documents`.
    pub fn resolve(
        &self,
        documents: &[CodeDocument],
        label_pairs: &SizePageMap,
        log: &mut RunLog,
    ) -> Vec<Assignment> {
        let missing = self.missing_sizes(label_pairs);
        if !missing.is_empty() {
            log.info(format!("Label has no pages for sizes {}", join_sizes(&missing)));
        }

        let mut assignments: Vec<Assignment> = documents
            .iter()
            .map(|d| match d.name.size {
                Some(size) => Assignment::Parsed(size),
                None => Assignment::Unresolved,
            })
            .collect();

        let mut unresolved: Vec<usize> = (0..documents.len())
            .filter(|i| assignments[*i] == Assignment::Unresolved)
            .collect();
        if unresolved.is_empty() {
            return assignments;
        }

        if self.fallback_eligible(documents) {
            // unparsed_sizes is already ascending
            let gap = self.unparsed_sizes(documents);
            unresolved.sort_by(|a, b| documents[*a].file_name.cmp(&documents[*b].file_name));
            for (index, size) in unresolved.iter().zip(gap) {
                log.warning(format!(
                    "{}: no size in file name, assigned {} by position",
                    documents[*index].file_name, size
                ));
                assignments[*index] = Assignment::Fallback(size);
            }
        } else {
            for index in &unresolved {
                log.warning(format!("{}: no size in file name, skipping", documents[*index].file_name));
            }
        }

        assignments
    }
}

fn join_sizes(sizes: &[Size]) -> String {
    sizes
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
