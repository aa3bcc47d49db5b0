//! Configuration for label assembly.

use crate::error::{Error, Result};
use crate::sizes::{Size, SizeRegistry, DEFAULT_SIZES};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the label document is chosen among the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSelection {
    /// The input with the greatest byte size is the label.
    LargestFile,
    /// The first input (by file name) whose name matches this regex.
    NamePattern(String),
}

/// Label assembly configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Canonical size catalog, strictly ascending.
    pub sizes: Vec<Size>,

    /// Words that introduce a size marker on a label page (`<word>: 42`).
    pub marker_keywords: Vec<String>,

    /// Case-insensitive word stems that may follow a size in a file name.
    pub size_word_stems: Vec<String>,

    /// Prefix of every output file name.
    pub output_prefix: String,

    /// Token used in place of the size for the combined document.
    pub all_sizes_token: String,

    /// Substitute for an empty article in output names.
    pub article_placeholder: String,

    /// Substitute for an empty color in output names.
    pub color_placeholder: String,

    /// Build the combined all-sizes document.
    pub create_combined: bool,

    /// Label selection rule.
    pub label_selection: LabelSelection,

    /// Treat a marker repeated on three consecutive marked pages as a data error.
    pub strict_label_markers: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblyConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            marker_keywords: vec!["Размер".to_string(), "Size".to_string()],
            size_word_stems: vec!["разм".to_string(), "size".to_string()],
            output_prefix: "Assembly".to_string(),
            all_sizes_token: "all-sizes".to_string(),
            article_placeholder: "NOARTICLE".to_string(),
            color_placeholder: "NOCOLOR".to_string(),
            create_combined: true,
            label_selection: LabelSelection::LargestFile,
            strict_label_markers: false,
        }
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the size catalog.
    pub fn with_sizes(mut self, sizes: Vec<Size>) -> Self {
        self.sizes = sizes;
        self
    }

    /// Set the label marker keywords.
    pub fn with_marker_keywords(mut self, keywords: Vec<String>) -> Self {
        self.marker_keywords = keywords;
        self
    }

    /// Set the output file name prefix.
    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    /// Set the combined document token.
    pub fn with_all_sizes_token(mut self, token: impl Into<String>) -> Self {
        self.all_sizes_token = token.into();
        self
    }

    /// Enable or disable the combined document.
    pub fn with_combined(mut self, enable: bool) -> Self {
        self.create_combined = enable;
        self
    }

    /// Set the label selection rule.
    pub fn with_label_selection(mut self, selection: LabelSelection) -> Self {
        self.label_selection = selection;
        self
    }

    /// Enable strict handling of repeated label markers.
    pub fn with_strict_label_markers(mut self, enable: bool) -> Self {
        self.strict_label_markers = enable;
        self
    }

    /// Build the size registry for this configuration.
    pub fn registry(&self) -> Result<SizeRegistry> {
        SizeRegistry::new(self.sizes.clone())
    }

    /// Check the configuration for values that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        self.registry()?;

        if self.marker_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(Error::InvalidConfig("no label marker keywords".to_string()));
        }
        if self.output_prefix.is_empty() {
            return Err(Error::InvalidConfig("output prefix is empty".to_string()));
        }
        if self.all_sizes_token.is_empty() {
            return Err(Error::InvalidConfig("all-sizes token is empty".to_string()));
        }
        if self.article_placeholder.is_empty() || self.color_placeholder.is_empty() {
            return Err(Error::InvalidConfig("name placeholders must not be empty".to_string()));
        }
        if let LabelSelection::NamePattern(pattern) = &self.label_selection {
            regex::Regex::new(pattern).map_err(|e| {
                Error::InvalidConfig(format!("invalid label name pattern '{}': {}", pattern, e))
            })?;
        }
        Ok(())
    }
}
