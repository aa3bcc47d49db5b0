//! Size, article and color extraction from free-form code document names.
//!
//! Code documents arrive with names like `Ю 3718 черный 56.pdf` or
//! `ART 100 Black 56размер.pdf`. There is no grammar, only a token heuristic:
//!
//! 1. The last purely numeric token that is a catalog size is the size.
//! 2. Otherwise, two digits followed (optionally after whitespace) by a size
//!    word stem, e.g. `56 размер` or `56size`, if the digits are a catalog size.
//! 3. Otherwise the size is absent.
//!
//! The article is the first two tokens. The color is whatever follows the
//! article, up to the size token when the size was found as a token after it.
//!
//! Parsing is total: any input yields a [`CodeName`], possibly with empty fields.

use crate::sizes::{Size, SizeRegistry};
use regex::Regex;
use std::path::Path;

/// Metadata parsed from a code document name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeName {
    /// First two tokens joined by a space; empty when the name has fewer tokens
    pub article: String,
    /// Tokens between the article and the size
    pub color: String,
    /// Catalog size, when one could be found
    pub size: Option<Size>,
}

/// Parser for code document names.
#[derive(Debug, Clone)]
pub struct NameParser {
    registry: SizeRegistry,
    size_word: Option<Regex>,
}

impl NameParser {
    /// Create a parser validating sizes against `registry`.
    ///
    /// `size_word_stems` are matched case-insensitively after a two-digit
    /// number; an empty list disables that rule.
    pub fn new(registry: SizeRegistry, size_word_stems: &[String]) -> Self {
        let stems: Vec<String> = size_word_stems
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| regex::escape(s))
            .collect();
        let size_word = if stems.is_empty() {
            None
        } else {
            Regex::new(&format!(r"(?i)(\d{{2}})\s*(?:{})", stems.join("|"))).ok()
        };
        Self {
            registry,
            size_word,
        }
    }

    /// Parse a file name. The extension, if any, is ignored.
    pub fn parse(&self, file_name: &str) -> CodeName {
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tokens: Vec<&str> = stem.split_whitespace().collect();

        let size = self
            .size_from_tokens(&tokens)
            .or_else(|| self.size_from_words(&stem));

        let article = if tokens.len() >= 2 {
            tokens[..2].join(" ")
        } else {
            String::new()
        };

        // Color stops at the size token only when the size sits after the article
        // and the color's first token; a regex-found size never matches a token.
        let color_end = size
            .and_then(|size| {
                let literal = size.to_string();
                tokens.iter().position(|t| *t == literal)
            })
            .filter(|idx| *idx > 2)
            .unwrap_or(tokens.len());
        let color = tokens
            .get(2..color_end)
            .map(|t| t.join(" "))
            .unwrap_or_default();

        CodeName {
            article,
            color,
            size,
        }
    }

    fn size_from_tokens(&self, tokens: &[&str]) -> Option<Size> {
        tokens.iter().rev().find_map(|token| {
            if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
                self.registry.parse(token)
            } else {
                None
            }
        })
    }

    fn size_from_words(&self, stem: &str) -> Option<Size> {
        let captures = self.size_word.as_ref()?.captures(stem)?;
        self.registry.parse(captures.get(1)?.as_str())
    }
}
