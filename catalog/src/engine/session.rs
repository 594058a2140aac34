//! Accumulated state of one query session

use std::collections::HashSet;

use crate::error::CatalogError;
use crate::types::{CatalogEntry, EntryId, Page, QueryState};

/// Everything fetched for one QueryState
///
/// Replaced wholesale on reset; nothing carries over except the generation
/// counter, which only ever increases.
#[derive(Debug)]
pub(crate) struct Session {
    pub query: QueryState,

    /// Bumped on every reset; fetches tagged with an older value are stale
    pub generation: u64,

    /// Deduplicated entries in arrival order
    pub entries: Vec<CatalogEntry>,
    seen: HashSet<EntryId>,

    /// Upstream offset reached: sum of items received, duplicates included
    pub offset: usize,

    /// Total reported by the most recent page, None before the first fetch
    pub total: Option<usize>,

    /// Set when a page came back empty although the total claimed more
    pub exhausted: bool,

    pub in_flight: bool,

    pub last_error: Option<CatalogError>,
}

impl Session {
    pub fn new(query: QueryState, generation: u64) -> Self {
        Self {
            query,
            generation,
            entries: Vec::new(),
            seen: HashSet::new(),
            offset: 0,
            total: None,
            exhausted: false,
            in_flight: false,
            last_error: None,
        }
    }

    /// Unknown before the first fetch, then driven by the reported total
    pub fn has_more(&self) -> bool {
        match self.total {
            None => true,
            Some(total) => !self.exhausted && self.offset < total,
        }
    }

    /// Apply a fetched page; returns how many new entries were added
    pub fn append(&mut self, page: Page) -> usize {
        let received = page.items.len();
        self.total = Some(page.total);
        self.offset += received;
        self.last_error = None;

        if received == 0 && self.offset < page.total {
            // Trusting the total here would request the same offset forever
            self.exhausted = true;
        }

        let before = self.entries.len();
        for entry in page.items {
            if self.seen.insert(entry.id.clone()) {
                self.entries.push(entry);
            }
        }
        self.entries.len() - before
    }

    /// Replace the favorite flag of an accumulated entry
    pub fn set_favorite(&mut self, id: &EntryId, is_favorite: bool) -> bool {
        match self.entries.iter_mut().find(|e| &e.id == id) {
            Some(entry) => {
                entry.is_favorite = is_favorite;
                true
            }
            None => false,
        }
    }
}
