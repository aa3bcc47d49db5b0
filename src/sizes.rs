//! The fixed, ordered catalog of garment sizes.
//!
//! The catalog serves two purposes: it rejects numbers that merely look like a
//! size (order numbers, page counts) and it defines the order in which per-size
//! outputs are concatenated.

use crate::error::{Error, Result};

/// A garment size, the join key between label pages and code documents.
pub type Size = u32;

/// Sizes used when no catalog is configured.
pub const DEFAULT_SIZES: [Size; 8] = [42, 44, 46, 48, 50, 52, 54, 56];

/// Ordered catalog of valid sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeRegistry {
    sizes: Vec<Size>,
}

impl Default for SizeRegistry {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
        }
    }
}

impl SizeRegistry {
    /// Build a registry from a catalog.
    ///
    /// The catalog must be non-empty and strictly ascending so that the
    /// canonical order is unambiguous.
    pub fn new(sizes: Vec<Size>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(Error::InvalidConfig("size catalog is empty".to_string()));
        }
        if let Some(pair) = sizes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::InvalidConfig(format!(
                "size catalog must be strictly ascending ({} is followed by {})",
                pair[0], pair[1]
            )));
        }
        Ok(Self { sizes })
    }

    /// Whether `size` belongs to the catalog.
    pub fn is_valid(&self, size: Size) -> bool {
        self.sizes.binary_search(&size).is_ok()
    }

    /// Catalog sizes in ascending order.
    pub fn canonical_order(&self) -> &[Size] {
        &self.sizes
    }

    /// Parse a purely numeric string into a catalog size.
    pub fn parse(&self, text: &str) -> Option<Size> {
        text.parse::<Size>().ok().filter(|size| self.is_valid(*size))
    }

    /// Number of sizes in the catalog.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Always false for a registry built through [`SizeRegistry::new`].
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
