//! QueryEngine - the catalog's paginated list

use std::sync::{Mutex, MutexGuard};

use super::session::Session;
use super::status::{LoadOutcome, LoadStatus};
use crate::error::CatalogError;
use crate::query::{FilterPlan, apply_filters};
use crate::source::PageSource;
use crate::types::{CatalogEntry, EntryId, QueryState};

/// Page size used by all three front-ends
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Items requested per fetch
    pub page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One logical, filterable, appendable list over a paginated source
///
/// At most one fetch is in flight per session. `reset` starts a new session;
/// a fetch issued before the reset is discarded when it lands.
///
/// Cancellation is by dropping the `load_next` future: the in-flight slot is
/// released and nothing is applied.
pub struct QueryEngine<S> {
    source: S,
    config: EngineConfig,
    plan: FilterPlan,
    session: Mutex<Session>,
}

impl<S: PageSource> QueryEngine<S> {
    /// Create an engine with the default page size
    pub fn new(source: S, query: QueryState) -> Self {
        let plan = FilterPlan::for_source(source.capabilities());
        Self {
            source,
            config: EngineConfig::default(),
            plan,
            session: Mutex::new(Session::new(query, 0)),
        }
    }

    /// Create an engine with an explicit configuration
    pub fn with_config(
        source: S,
        query: QueryState,
        config: EngineConfig,
    ) -> Result<Self, CatalogError> {
        if config.page_size == 0 {
            return Err(CatalogError::InvariantViolation(
                "page size must be positive".to_string(),
            ));
        }
        let mut engine = Self::new(source, query);
        engine.config = config;
        Ok(engine)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // Session updates never panic midway, so a poisoned lock still holds consistent state
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch the next page of the current session and append it
    ///
    /// Returns without fetching when the source is exhausted or a fetch is
    /// already in flight. A failed fetch leaves entries and offset untouched
    /// and is recorded as `last_error`; calling again retries the same offset.
    pub async fn load_next(&self) -> Result<LoadOutcome, CatalogError> {
        let (generation, offset, query) = {
            let mut session = self.lock();
            if session.in_flight {
                return Ok(LoadOutcome::AlreadyLoading);
            }
            if !session.has_more() {
                return Ok(LoadOutcome::Exhausted);
            }
            session.in_flight = true;
            (session.generation, session.offset, session.query.clone())
        };

        let limit = self.config.page_size;
        tracing::debug!(generation, offset, limit, "Fetching catalog page");

        let mut guard = InFlightGuard {
            engine: self,
            generation,
            armed: true,
        };
        let result = self.source.fetch_page(offset, limit, &query).await;
        guard.armed = false;

        let mut session = self.lock();
        if session.generation != generation {
            tracing::debug!(
                generation,
                current = session.generation,
                "Discarding page from a previous session"
            );
            return Ok(LoadOutcome::Stale);
        }
        session.in_flight = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(generation, offset, error = %e, "Catalog page fetch failed");
                let err = CatalogError::Fetch(e);
                session.last_error = Some(err.clone());
                return Err(err);
            }
        };

        if page.offset != offset {
            let err = CatalogError::InvariantViolation(format!(
                "requested offset {} but source answered for offset {}",
                offset, page.offset
            ));
            session.last_error = Some(err.clone());
            return Err(err);
        }

        let received = page.count();
        let total = page.total;
        let added = session.append(page);
        tracing::debug!(
            generation,
            received,
            added,
            total,
            accumulated = session.entries.len(),
            "Applied catalog page"
        );

        Ok(LoadOutcome::Appended { received, added })
    }

    /// Discard everything and start a new session for `query`
    ///
    /// Does not fetch; call `load_next` to populate the new session.
    pub fn reset(&self, query: QueryState) {
        let mut session = self.lock();
        let generation = session.generation + 1;
        tracing::debug!(generation, ?query, "Resetting catalog session");
        *session = Session::new(query, generation);
    }

    /// Accumulated entries after the favorites, type and text filters
    pub fn visible_items(&self) -> Vec<CatalogEntry> {
        let session = self.lock();
        apply_filters(&session.entries, &session.query, self.plan)
    }

    /// True before the first fetch; afterwards true iff the reported total
    /// exceeds the number of items received
    pub fn has_more(&self) -> bool {
        self.lock().has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight
    }

    pub fn last_error(&self) -> Option<CatalogError> {
        self.lock().last_error.clone()
    }

    pub fn status(&self) -> LoadStatus {
        let session = self.lock();
        if session.in_flight {
            LoadStatus::Loading
        } else if session.last_error.is_some() {
            LoadStatus::Errored
        } else if session.total.is_none() {
            LoadStatus::Idle
        } else if apply_filters(&session.entries, &session.query, self.plan).is_empty() {
            LoadStatus::Empty
        } else {
            LoadStatus::Loaded
        }
    }

    /// Toggle the favorites-only view without starting a new session
    ///
    /// Favorites are never sent to the source, so what has been fetched stays
    /// valid; only the view changes.
    pub fn set_favorites_only(&self, on: bool) {
        self.lock().query.favorites_only = on;
    }

    /// The current session's query
    pub fn query(&self) -> QueryState {
        self.lock().query.clone()
    }

    /// Deduplicated entries accumulated so far, before filtering
    pub fn accumulated_len(&self) -> usize {
        self.lock().entries.len()
    }

    /// An accumulated entry of the current session, filtered or not
    pub fn get(&self, id: &EntryId) -> Option<CatalogEntry> {
        self.lock().entries.iter().find(|e| &e.id == id).cloned()
    }

    /// Upstream offset the next fetch will use
    pub fn offset(&self) -> usize {
        self.lock().offset
    }

    /// Patch the favorite flag of an accumulated entry in the current session
    ///
    /// Returns false if the entry has not been fetched in this session.
    pub fn set_favorite(&self, id: &EntryId, is_favorite: bool) -> bool {
        self.lock().set_favorite(id, is_favorite)
    }
}

/// Releases the in-flight slot if a `load_next` future is dropped mid-fetch
struct InFlightGuard<'a, S> {
    engine: &'a QueryEngine<S>,
    generation: u64,
    armed: bool,
}

impl<S> Drop for InFlightGuard<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut session = self.engine.session.lock().unwrap_or_else(|e| e.into_inner());
        if session.generation == self.generation {
            tracing::debug!(generation = self.generation, "Catalog page fetch cancelled");
            session.in_flight = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::ErrorKind;
    use crate::error::FetchError;
    use crate::source::SourceCapabilities;
    use crate::types::{Page, Type};

    type Responder = dyn Fn(usize, usize, &QueryState) -> Result<Page, FetchError> + Send + Sync;

    /// Page source driven by a closure, with an optional gate that holds
    /// fetches until released
    struct ScriptedSource {
        respond: Box<Responder>,
        calls: AtomicUsize,
        offsets: Mutex<Vec<usize>>,
        hold: AtomicBool,
        release: Notify,
        caps: SourceCapabilities,
    }

    impl ScriptedSource {
        fn new<F>(respond: F) -> Self
        where
            F: Fn(usize, usize, &QueryState) -> Result<Page, FetchError> + Send + Sync + 'static,
        {
            Self {
                respond: Box::new(respond),
                calls: AtomicUsize::new(0),
                offsets: Mutex::new(Vec::new()),
                hold: AtomicBool::new(false),
                release: Notify::new(),
                caps: SourceCapabilities::default(),
            }
        }

        fn held(self) -> Self {
            self.hold.store(true, Ordering::SeqCst);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn offsets(&self) -> Vec<usize> {
            self.offsets.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        async fn fetch_page(
            &self,
            offset: usize,
            limit: usize,
            query: &QueryState,
        ) -> Result<Page, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.offsets.lock().unwrap().push(offset);
            if self.hold.load(Ordering::SeqCst) {
                self.release.notified().await;
            }
            (self.respond)(offset, limit, query)
        }

        fn capabilities(&self) -> SourceCapabilities {
            self.caps
        }
    }

    fn mon(id: usize, favorite: bool) -> CatalogEntry {
        CatalogEntry::new(id as u32, format!("Mon{}", id), vec![Type::Normal])
            .unwrap()
            .with_favorite(favorite)
    }

    /// A catalog of `total` entries with ids 1..=total
    fn catalog(total: usize, favorites: &'static [usize]) -> ScriptedSource {
        ScriptedSource::new(move |offset, limit, _| {
            let end = (offset + limit).min(total);
            let items = (offset..end)
                .map(|i| mon(i + 1, favorites.contains(&(i + 1))))
                .collect();
            Ok(Page::new(items, offset, total))
        })
    }

    async fn wait_for_calls(source: &ScriptedSource, n: usize) {
        while source.calls() < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_paging_with_favorites_filter() {
        let engine = QueryEngine::new(catalog(120, &[3, 17, 33]), QueryState::new());

        let outcome = engine.load_next().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Appended { received: 20, added: 20 });
        assert!(engine.has_more());

        engine.load_next().await.unwrap();
        assert_eq!(engine.accumulated_len(), 40);
        assert!(engine.has_more());
        assert_eq!(engine.source().offsets(), vec![0, 20]);

        engine.set_favorites_only(true);

        assert_eq!(engine.visible_items().len(), 3);
        assert_eq!(engine.accumulated_len(), 40);
        assert_eq!(engine.source().calls(), 2);
    }

    #[tokio::test]
    async fn test_favorites_only_session() {
        let engine = QueryEngine::new(
            catalog(120, &[3, 17, 33, 99]),
            QueryState::new().favorites_only(true),
        );

        engine.load_next().await.unwrap();
        engine.load_next().await.unwrap();

        let ids: Vec<String> = engine
            .visible_items()
            .iter()
            .map(|e| e.id.to_string())
            .collect();
        assert_eq!(ids, vec!["3", "17", "33"]);
    }

    #[tokio::test]
    async fn test_visible_items_never_contain_duplicates() {
        // Overlapping pages: every page repeats the last id of the previous one
        let source = ScriptedSource::new(|offset, _, _| {
            let start = offset.saturating_sub(1);
            let items = (start..offset + 5).map(|i| mon(i, false)).collect();
            Ok(Page::new(items, offset, 30))
        });
        let engine = QueryEngine::new(source, QueryState::new());

        for _ in 0..3 {
            engine.load_next().await.unwrap();
        }

        let visible = engine.visible_items();
        let unique: HashSet<_> = visible.iter().map(|e| e.id.clone()).collect();
        assert_eq!(unique.len(), visible.len());
    }

    #[tokio::test]
    async fn test_text_and_type_filters_client_side() {
        let source = ScriptedSource::new(|offset, _, _| {
            let items = vec![
                CatalogEntry::new("4", "Charmander", vec![Type::Fire]).unwrap(),
                CatalogEntry::new("6", "Charizard", vec![Type::Fire, Type::Flying]).unwrap(),
                CatalogEntry::new("7", "Squirtle", vec![Type::Water]).unwrap(),
            ];
            Ok(Page::new(items, offset, 3))
        });
        let engine = QueryEngine::new(source, QueryState::new().with_text("CHAR"));
        engine.load_next().await.unwrap();
        assert_eq!(engine.visible_items().len(), 2);

        engine.reset(QueryState::new().with_type(Type::Flying));
        engine.load_next().await.unwrap();
        assert_eq!(engine.visible_items()[0].name, "Charizard");

        engine.reset(QueryState::new().with_text("7"));
        engine.load_next().await.unwrap();
        assert_eq!(engine.visible_items()[0].name, "Squirtle");
    }

    #[tokio::test]
    async fn test_server_side_filters_not_reapplied() {
        let mut source = catalog(5, &[]);
        source.caps = SourceCapabilities {
            filters_type: true,
            filters_text: true,
            ..Default::default()
        };
        let engine = QueryEngine::new(source, QueryState::new().with_text("nomatch"));

        engine.load_next().await.unwrap();

        assert_eq!(engine.visible_items().len(), 5);
    }

    #[tokio::test]
    async fn test_reset_clears_session() {
        let engine = QueryEngine::new(catalog(40, &[]), QueryState::new());
        engine.load_next().await.unwrap();
        engine.load_next().await.unwrap();
        assert!(!engine.has_more());

        engine.reset(QueryState::new().with_text("mon1"));

        assert!(engine.visible_items().is_empty());
        assert_eq!(engine.accumulated_len(), 0);
        assert_eq!(engine.offset(), 0);
        assert!(engine.has_more());
        assert_eq!(engine.status(), LoadStatus::Idle);

        engine.load_next().await.unwrap();
        assert_eq!(engine.source().offsets(), vec![0, 20, 0]);
        assert!(engine.has_more());
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let engine = QueryEngine::new(
            ScriptedSource::new(|offset, _, _| Ok(Page::empty(offset))),
            QueryState::new(),
        );

        engine.load_next().await.unwrap();

        assert!(!engine.has_more());
        assert!(engine.visible_items().is_empty());
        assert_eq!(engine.status(), LoadStatus::Empty);
        assert_eq!(engine.load_next().await.unwrap(), LoadOutcome::Exhausted);
        assert_eq!(engine.source().calls(), 1);
    }

    #[tokio::test]
    async fn test_short_page_defers_to_total() {
        let source = ScriptedSource::new(|offset, _, _| {
            let items = (offset..offset + 15).map(|i| mon(i + 1, false)).collect();
            Ok(Page::new(items, offset, 120))
        });
        let engine = QueryEngine::new(source, QueryState::new());

        engine.load_next().await.unwrap();
        assert!(engine.has_more());
        engine.load_next().await.unwrap();

        assert_eq!(engine.source().offsets(), vec![0, 15]);
        assert_eq!(engine.accumulated_len(), 30);
    }

    #[tokio::test]
    async fn test_empty_page_below_total_stops_loading() {
        let source = ScriptedSource::new(|offset, _, _| {
            let items = if offset == 0 {
                (0..20).map(|i| mon(i + 1, false)).collect()
            } else {
                Vec::new()
            };
            Ok(Page::new(items, offset, 120))
        });
        let engine = QueryEngine::new(source, QueryState::new());

        engine.load_next().await.unwrap();
        engine.load_next().await.unwrap();

        assert!(!engine.has_more());
        assert_eq!(engine.load_next().await.unwrap(), LoadOutcome::Exhausted);
        assert_eq!(engine.source().calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retryable() {
        let fail_next = Arc::new(AtomicBool::new(false));
        let flag = fail_next.clone();
        let source = ScriptedSource::new(move |offset, limit, _| {
            if flag.swap(false, Ordering::SeqCst) {
                return Err(FetchError::Status {
                    status: 503,
                    message: "Service Unavailable".into(),
                });
            }
            let items = (offset..offset + limit).map(|i| mon(i + 1, false)).collect();
            Ok(Page::new(items, offset, 100))
        });
        let engine = QueryEngine::new(source, QueryState::new());
        engine.load_next().await.unwrap();

        fail_next.store(true, Ordering::SeqCst);
        let err = engine.load_next().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert_eq!(engine.last_error(), Some(err));
        assert_eq!(engine.status(), LoadStatus::Errored);
        assert_eq!(engine.accumulated_len(), 20);
        assert_eq!(engine.offset(), 20);

        engine.load_next().await.unwrap();

        assert_eq!(engine.source().offsets(), vec![0, 20, 20]);
        assert_eq!(engine.accumulated_len(), 40);
        assert_eq!(engine.last_error(), None);
        assert_eq!(engine.status(), LoadStatus::Loaded);
    }

    #[tokio::test]
    async fn test_first_fetch_failure_is_not_empty() {
        let engine = QueryEngine::new(
            ScriptedSource::new(|_, _, _| Err(FetchError::Transport("connection refused".into()))),
            QueryState::new(),
        );

        assert!(engine.load_next().await.is_err());

        assert_eq!(engine.status(), LoadStatus::Errored);
        assert!(engine.has_more());
        assert!(!engine.is_loading());
    }

    #[tokio::test]
    async fn test_single_fetch_in_flight() {
        let engine = Arc::new(QueryEngine::new(catalog(100, &[]).held(), QueryState::new()));

        let first = tokio::spawn({
            let engine = engine.clone();
            async move { engine.load_next().await }
        });
        wait_for_calls(engine.source(), 1).await;

        assert!(engine.is_loading());
        assert_eq!(engine.status(), LoadStatus::Loading);
        assert_eq!(engine.load_next().await.unwrap(), LoadOutcome::AlreadyLoading);
        assert_eq!(engine.source().calls(), 1);

        engine.source().release.notify_one();
        assert!(first.await.unwrap().unwrap().is_appended());

        engine.source().hold.store(false, Ordering::SeqCst);
        engine.load_next().await.unwrap();
        assert_eq!(engine.source().calls(), 2);
        assert_eq!(engine.accumulated_len(), 40);
    }

    #[tokio::test]
    async fn test_stale_fetch_is_discarded() {
        let engine = Arc::new(QueryEngine::new(catalog(100, &[]).held(), QueryState::new()));

        let stale = tokio::spawn({
            let engine = engine.clone();
            async move { engine.load_next().await }
        });
        wait_for_calls(engine.source(), 1).await;

        engine.reset(QueryState::new().with_type(Type::Normal));
        engine.source().release.notify_one();

        assert_eq!(stale.await.unwrap().unwrap(), LoadOutcome::Stale);
        assert!(engine.visible_items().is_empty());
        assert_eq!(engine.accumulated_len(), 0);
        assert!(!engine.is_loading());

        engine.source().hold.store(false, Ordering::SeqCst);
        engine.load_next().await.unwrap();
        assert_eq!(engine.accumulated_len(), 20);
        assert_eq!(engine.source().offsets(), vec![0, 0]);
    }

    #[tokio::test]
    async fn test_dropped_fetch_releases_slot() {
        let engine = QueryEngine::new(catalog(100, &[]).held(), QueryState::new());

        let timed_out = tokio::time::timeout(Duration::from_millis(10), engine.load_next()).await;
        assert!(timed_out.is_err());
        assert!(!engine.is_loading());
        assert_eq!(engine.offset(), 0);

        engine.source().hold.store(false, Ordering::SeqCst);
        assert!(engine.load_next().await.unwrap().is_appended());
        assert_eq!(engine.source().offsets(), vec![0, 0]);
    }

    #[tokio::test]
    async fn test_mismatched_page_offset_is_rejected() {
        let source = ScriptedSource::new(|_, _, _| Ok(Page::new(vec![mon(1, false)], 5, 10)));
        let engine = QueryEngine::new(source, QueryState::new());

        let err = engine.load_next().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Invariant);
        assert_eq!(engine.accumulated_len(), 0);
        assert_eq!(engine.offset(), 0);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = QueryEngine::with_config(
            catalog(10, &[]),
            QueryState::new(),
            EngineConfig { page_size: 0 },
        );

        assert_eq!(result.err().unwrap().kind(), ErrorKind::Invariant);
    }

    #[tokio::test]
    async fn test_custom_page_size() {
        let engine = QueryEngine::with_config(
            catalog(10, &[]),
            QueryState::new(),
            EngineConfig { page_size: 4 },
        )
        .unwrap();

        while engine.has_more() {
            engine.load_next().await.unwrap();
        }

        assert_eq!(engine.source().offsets(), vec![0, 4, 8]);
        assert_eq!(engine.accumulated_len(), 10);
    }

    #[tokio::test]
    async fn test_set_favorite_patches_current_session() {
        let engine = QueryEngine::new(catalog(20, &[]), QueryState::new().favorites_only(true));
        engine.load_next().await.unwrap();
        assert_eq!(engine.status(), LoadStatus::Empty);

        assert!(engine.set_favorite(&EntryId::from(7u32), true));

        let visible = engine.visible_items();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.as_str(), "7");
        assert_eq!(engine.status(), LoadStatus::Loaded);
        assert!(engine.get(&EntryId::from(7u32)).unwrap().is_favorite);
        assert!(engine.get(&EntryId::from(99u32)).is_none());
    }
}
