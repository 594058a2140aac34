//! What a session is doing, and what a `load_next` call did

/// Session status as a list view renders it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing fetched yet in this session
    Idle,
    /// A fetch is in flight
    Loading,
    /// At least one visible item
    Loaded,
    /// Fetched, but nothing visible (empty catalog or no filter matches)
    Empty,
    /// The last fetch failed; see `last_error`
    Errored,
}

/// Result of one `load_next` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and applied
    Appended {
        /// Items the source returned
        received: usize,
        /// Items actually added after dropping already-seen ids
        added: usize,
    },
    /// The source is known to be exhausted; nothing was fetched
    Exhausted,
    /// Another fetch is in flight for this session; nothing was fetched
    AlreadyLoading,
    /// The session was reset while fetching; the page was discarded
    Stale,
}

impl LoadOutcome {
    /// True if this call issued a fetch whose result was applied
    pub fn is_appended(&self) -> bool {
        matches!(self, LoadOutcome::Appended { .. })
    }
}
