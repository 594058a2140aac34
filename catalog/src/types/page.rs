//! Fetch windows over a paginated source

use super::entry::CatalogEntry;

/// One page returned by a source
///
/// `offset + items.len() <= total` is expected but not enforced: the upstream
/// total may change between fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<CatalogEntry>,

    /// Offset this page was fetched at
    pub offset: usize,

    /// Total number of items the source reported at fetch time
    pub total: usize,
}

impl Page {
    pub fn new(items: Vec<CatalogEntry>, offset: usize, total: usize) -> Self {
        Self {
            items,
            offset,
            total,
        }
    }

    /// An empty page reporting an empty catalog
    pub fn empty(offset: usize) -> Self {
        Self::new(Vec::new(), offset, 0)
    }

    /// Number of items returned
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// True if fewer items came back than were asked for
    pub fn is_short(&self, limit: usize) -> bool {
        self.items.len() < limit
    }
}
