//! Label scanning: which two pages of the label document belong to each size.
//!
//! Each size is represented on the label by two consecutive marked pages that
//! carry the same size marker (`Size: 42`, `Размер: 42`). Pages without a marker
//! are skipped and do not break a pair.

use crate::pdf::PageTextSource;
use crate::run_log::RunLog;
use crate::sizes::{Size, SizeRegistry};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// The two label pages for one size, 0-based, `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePagePair {
    /// First label page
    pub first: usize,
    /// Second label page
    pub second: usize,
}

/// Size to label page pair.
pub type SizePageMap = BTreeMap<Size, SizePagePair>;

/// Pairing state between marked pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingState {
    /// No candidate page
    Idle,
    /// A marked page is waiting for its partner
    Armed {
        /// Size of the candidate
        size: Size,
        /// Page index of the candidate
        first_page: usize,
    },
}

/// What a page did to the pairing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairEvent {
    /// Page carried no marker; state unchanged
    Skipped,
    /// Page armed a new candidate
    Armed {
        /// Size of the new candidate
        size: Size,
        /// Candidate that was abandoned by this page, if any
        replaced: Option<Size>,
    },
    /// Page completed a pair
    Paired {
        /// Paired size
        size: Size,
        /// The completed pair
        pair: SizePagePair,
        /// Whether an earlier pair for this size was overwritten
        replaced: bool,
    },
    /// Page repeated the marker of the pair just completed (strict mode only);
    /// the size is dropped from the result
    Rejected {
        /// Offending size
        size: Size,
    },
}

/// Two-state machine turning a sequence of page markers into size pairs.
#[derive(Debug, Clone)]
pub struct PagePairer {
    state: PairingState,
    pairs: SizePageMap,
    strict: bool,
    just_paired: Option<Size>,
    rejected: BTreeSet<Size>,
}

impl PagePairer {
    /// Create a pairer.
    ///
    /// In strict mode a marker seen right after its pair was completed (a third
    /// consecutive marked page with the same size) is a data error and the size
    /// is excluded. Otherwise it simply starts a new candidate.
    pub fn new(strict: bool) -> Self {
        Self {
            state: PairingState::Idle,
            pairs: SizePageMap::new(),
            strict,
            just_paired: None,
            rejected: BTreeSet::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> PairingState {
        self.state
    }

    /// Feed the marker found on page `page`, if any.
    pub fn feed(&mut self, page: usize, marker: Option<Size>) -> PairEvent {
        let size = match marker {
            Some(size) => size,
            None => return PairEvent::Skipped,
        };

        if self.strict && self.just_paired == Some(size) {
            self.pairs.remove(&size);
            self.rejected.insert(size);
            self.state = PairingState::Idle;
            self.just_paired = None;
            return PairEvent::Rejected { size };
        }
        self.just_paired = None;

        match self.state {
            PairingState::Armed {
                size: armed,
                first_page,
            } if armed == size => {
                self.state = PairingState::Idle;
                if self.rejected.contains(&size) {
                    return PairEvent::Rejected { size };
                }
                let pair = SizePagePair {
                    first: first_page,
                    second: page,
                };
                let replaced = self.pairs.insert(size, pair).is_some();
                self.just_paired = Some(size);
                PairEvent::Paired {
                    size,
                    pair,
                    replaced,
                }
            },
            PairingState::Armed { size: armed, .. } => {
                self.state = PairingState::Armed {
                    size,
                    first_page: page,
                };
                PairEvent::Armed {
                    size,
                    replaced: Some(armed),
                }
            },
            PairingState::Idle => {
                self.state = PairingState::Armed {
                    size,
                    first_page: page,
                };
                PairEvent::Armed {
                    size,
                    replaced: None,
                }
            },
        }
    }

    /// Pairs collected so far.
    pub fn pairs(&self) -> &SizePageMap {
        &self.pairs
    }

    /// Consume the pairer and return the collected pairs.
    pub fn finish(self) -> SizePageMap {
        self.pairs
    }
}

/// Finds size markers on label pages and pairs them.
#[derive(Debug, Clone)]
pub struct LabelScanner {
    registry: SizeRegistry,
    marker: Option<Regex>,
    strict: bool,
}

impl LabelScanner {
    /// Create a scanner recognising `<keyword>:<whitespace><digits>` for each
    /// keyword. Keywords are matched literally and case-sensitively.
    pub fn new(registry: SizeRegistry, keywords: &[String], strict: bool) -> Self {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();
        let marker = if alternatives.is_empty() {
            None
        } else {
            Regex::new(&format!(r"(?:{}):\s*(\d+)", alternatives.join("|"))).ok()
        };
        Self {
            registry,
            marker,
            strict,
        }
    }

    /// The size marker in `text`, if any. Only the first marker counts.
    pub fn find_size_in_text(&self, text: &str) -> Option<Size> {
        let captures = self.marker.as_ref()?.captures(text)?;
        captures.get(1)?.as_str().parse().ok()
    }

    /// Scan all pages of `source`.
    ///
    /// A page whose text cannot be extracted is treated as blank. An empty
    /// result means the label has no usable size pages.
    pub fn scan<S: PageTextSource>(&self, source: &S, log: &mut RunLog) -> SizePageMap {
        let page_count = source.page_count();
        log.info(format!("Label has {} pages", page_count));

        let mut pairer = PagePairer::new(self.strict);
        for page in 0..page_count {
            let text = match source.page_text(page) {
                Ok(text) => text,
                Err(e) => {
                    log.warning(format!("Failed to extract text from label page {}: {}", page, e));
                    String::new()
                },
            };
            let marker = self.find_size_in_text(&text);

            match pairer.feed(page, marker) {
                PairEvent::Skipped => {},
                PairEvent::Armed { size, replaced } => {
                    if let Some(previous) = replaced {
                        log::debug!(
                            "Label page {} (size {}) interrupted unpaired size {}",
                            page,
                            size,
                            previous
                        );
                    }
                },
                PairEvent::Paired {
                    size,
                    pair,
                    replaced,
                } => {
                    if replaced {
                        log.warning(format!("Size {} appears again on the label, using the later pages", size));
                    }
                    if !self.registry.is_valid(size) {
                        log.warning(format!("Label size {} is not in the size catalog", size));
                    }
                    log.info(format!("Size {}: pages {}+{}", size, pair.first, pair.second));
                },
                PairEvent::Rejected { size } => {
                    log.error(format!(
                        "Size {} is marked on more than two consecutive label pages (page {}), dropping it",
                        size, page
                    ));
                },
            }
        }

        let pairs = pairer.finish();
        if pairs.is_empty() {
            log.warning("No size pages found on the label");
        }
        pairs
    }
}
