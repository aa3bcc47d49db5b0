//! Output file naming.
//!
//! Downstream consumers parse these names, so the layout is fixed:
//!
//! ```text
//! <prefix>_<article without spaces>_<color>_<size>.pdf
//! <prefix>_<article without spaces>_<color>_<all-sizes token>.pdf
//! ```
//!
//! Empty article or color fields are replaced by placeholders so a name never
//! contains an empty segment.

use crate::config::AssemblyConfig;
use crate::name_parser::CodeName;
use crate::sizes::Size;

const EXTENSION: &str = "pdf";

/// Builds deterministic output file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    prefix: String,
    all_sizes_token: String,
    article_placeholder: String,
    color_placeholder: String,
}

impl OutputNaming {
    /// Naming scheme taken from `config`.
    pub fn from_config(config: &AssemblyConfig) -> Self {
        Self {
            prefix: config.output_prefix.clone(),
            all_sizes_token: config.all_sizes_token.clone(),
            article_placeholder: config.article_placeholder.clone(),
            color_placeholder: config.color_placeholder.clone(),
        }
    }

    /// File name of the per-size output for `name`.
    pub fn per_size(&self, name: &CodeName, size: Size) -> String {
        self.file_name(name, &size.to_string())
    }

    /// File name of the combined output, derived from `name`.
    pub fn combined(&self, name: &CodeName) -> String {
        self.file_name(name, &self.all_sizes_token)
    }

    fn file_name(&self, name: &CodeName, tail: &str) -> String {
        let article = name.article.replace(' ', "");
        let article = if article.is_empty() {
            self.article_placeholder.as_str()
        } else {
            article.as_str()
        };
        let color = if name.color.is_empty() {
            self.color_placeholder.as_str()
        } else {
            name.color.as_str()
        };
        format!("{}_{}_{}_{}.{}", self.prefix, article, color, tail, EXTENSION)
    }
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self::from_config(&AssemblyConfig::default())
    }
}
