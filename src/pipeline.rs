//! End-to-end assembly run.
//!
//! ```text
//! discover → select label → scan label → parse + resolve sizes
//!          → assemble per size → combine → outcome
//! ```
//!
//! Only three conditions abort a run: no input documents, no label document
//! (or nothing besides it), and a label without size pages. Every other problem
//! is logged and the affected item left out.

use crate::assembler::{AssembledDocument, DocumentAssembler};
use crate::assignment::{Assignment, AssignmentResolver, CodeDocument};
use crate::combined::CombinedBuilder;
use crate::config::AssemblyConfig;
use crate::discovery::{discover_inputs, selector_for, LabelSelector};
use crate::error::{Error, Result};
use crate::label::{LabelScanner, SizePagePair};
use crate::name_parser::NameParser;
use crate::output_name::OutputNaming;
use crate::pdf::PdfSource;
use crate::run_log::RunLog;
use crate::sizes::{Size, SizeRegistry};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a run as seen by the caller.
#[derive(Debug, Clone)]
pub struct AssemblyOutcome {
    /// False only when the run aborted
    pub success: bool,
    /// Produced files: per-size outputs in creation order, then the combined one
    pub documents: Vec<PathBuf>,
    /// Per-size outputs with their sizes
    pub assemblies: Vec<AssembledDocument>,
    /// Code documents that were left out, by file name
    pub skipped: Vec<String>,
    /// Rendered run log
    pub log: String,
}

/// What a successful run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Per-size outputs in creation order
    pub assemblies: Vec<AssembledDocument>,
    /// Combined document, if one was written
    pub combined: Option<PathBuf>,
    /// Code documents that were left out, by file name
    pub skipped: Vec<String>,
}

impl RunReport {
    /// All produced files, combined document last.
    pub fn documents(&self) -> Vec<PathBuf> {
        self.assemblies
            .iter()
            .map(|a| a.path.clone())
            .chain(self.combined.clone())
            .collect()
    }
}

/// One assembly run over an input/output directory pair.
///
/// Runs on disjoint directories are independent; the pipeline holds no shared
/// state.
pub struct AssemblyPipeline {
    input_dir: PathBuf,
    output_dir: PathBuf,
    config: AssemblyConfig,
    registry: SizeRegistry,
    selector: Box<dyn LabelSelector>,
}

impl AssemblyPipeline {
    /// Create a pipeline. The configuration is validated here.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: AssemblyConfig,
    ) -> Result<Self> {
        config.validate()?;
        let registry = config.registry()?;
        let selector = selector_for(&config.label_selection)?;
        Ok(Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            config,
            registry,
            selector,
        })
    }

    /// Replace the configured label selection rule.
    pub fn with_label_selector(mut self, selector: impl LabelSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Input directory.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run and fold any fatal error into an unsuccessful outcome.
    pub fn run(&self) -> AssemblyOutcome {
        let mut log = RunLog::new();
        match self.try_run(&mut log) {
            Ok(report) => AssemblyOutcome {
                success: true,
                documents: report.documents(),
                assemblies: report.assemblies,
                skipped: report.skipped,
                log: log.text(),
            },
            Err(e) => {
                log.error(e.to_string());
                AssemblyOutcome {
                    success: false,
                    documents: Vec::new(),
                    assemblies: Vec::new(),
                    skipped: Vec::new(),
                    log: log.text(),
                }
            },
        }
    }

    /// Run, returning fatal conditions as errors.
    pub fn try_run(&self, log: &mut RunLog) -> Result<RunReport> {
        fs::create_dir_all(&self.output_dir)?;

        let mut inputs = discover_inputs(&self.input_dir)?;
        if inputs.is_empty() {
            return Err(Error::NoInputDocuments(self.input_dir.clone()));
        }

        let label_index = self
            .selector
            .select(&inputs)
            .ok_or_else(|| Error::NoLabelDocument(self.selector.describe()))?;
        let label_input = inputs.remove(label_index);
        if inputs.is_empty() {
            return Err(Error::NoCodeDocuments);
        }
        log.info(format!(
            "Label: {} ({}), {} code documents",
            label_input.file_name,
            self.selector.describe(),
            inputs.len()
        ));

        let label = PdfSource::open(&label_input.path)?;
        let scanner = LabelScanner::new(
            self.registry.clone(),
            &self.config.marker_keywords,
            self.config.strict_label_markers,
        );
        let label_pairs = scanner.scan(&label, log);
        if label_pairs.is_empty() {
            return Err(Error::NoLabelPages(label_input.file_name));
        }

        let parser = NameParser::new(self.registry.clone(), &self.config.size_word_stems);
        let documents: Vec<CodeDocument> = inputs
            .into_iter()
            .map(|input| CodeDocument {
                name: parser.parse(&input.file_name),
                path: input.path,
                file_name: input.file_name,
            })
            .collect();

        let resolver = AssignmentResolver::new(self.registry.clone());
        let assignments = resolver.resolve(&documents, &label_pairs, log);

        let naming = OutputNaming::from_config(&self.config);
        let assembler = DocumentAssembler::new(&label);
        let mut report = RunReport::default();
        let mut written: BTreeSet<PathBuf> = BTreeSet::new();

        for (document, assignment) in documents.iter().zip(&assignments) {
            let size = match assignment {
                Assignment::Parsed(size) | Assignment::Fallback(size) => *size,
                Assignment::Unresolved => {
                    report.skipped.push(document.file_name.clone());
                    continue;
                },
            };
            let pair = match label_pairs.get(&size) {
                Some(pair) => *pair,
                None => {
                    log.warning(format!("{}: label has no pages for size {}", document.file_name, size));
                    report.skipped.push(document.file_name.clone());
                    continue;
                },
            };

            let output = self.output_dir.join(naming.per_size(&document.name, size));
            if written.contains(&output) {
                log.warning(format!(
                    "{}: {} was already produced in this run, skipping",
                    document.file_name,
                    output.display()
                ));
                report.skipped.push(document.file_name.clone());
                continue;
            }

            match self.assemble_one(&assembler, document, size, pair, &output, log) {
                Some(assembled) => {
                    written.insert(output);
                    report.assemblies.push(assembled);
                },
                None => report.skipped.push(document.file_name.clone()),
            }
        }

        if self.config.create_combined && !report.assemblies.is_empty() {
            // Named after the first code document in enumeration order.
            let output = self.output_dir.join(naming.combined(&documents[0].name));
            log.info("Building combined document");
            let builder = CombinedBuilder::new(self.registry.clone());
            match builder.build(&report.assemblies, &output, log) {
                Ok(Some(pages)) => {
                    log.info(format!("Combined: {} ({} pages)", file_name(&output), pages));
                    report.combined = Some(output);
                },
                Ok(None) => {},
                Err(e) => log.error(format!("Failed to build combined document: {}", e)),
            }
        }

        log.info(format!(
            "Done: {} assembled, {} skipped",
            report.assemblies.len(),
            report.skipped.len()
        ));
        Ok(report)
    }

    fn assemble_one(
        &self,
        assembler: &DocumentAssembler<'_>,
        document: &CodeDocument,
        size: Size,
        pair: SizePagePair,
        output: &Path,
        log: &mut RunLog,
    ) -> Option<AssembledDocument> {
        let code = match PdfSource::open(&document.path) {
            Ok(code) => code,
            Err(e) => {
                log.error(format!("{}: cannot open: {}", document.file_name, e));
                return None;
            },
        };

        match assembler.assemble(&code, size, pair, output) {
            Ok(assembled) => {
                log.info(format!(
                    "Size {}: {} -> {} ({} pages)",
                    size,
                    document.file_name,
                    file_name(output),
                    assembled.page_count
                ));
                Some(assembled)
            },
            Err(e) => {
                log.error(format!("{}: assembly failed: {}", document.file_name, e));
                None
            },
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
