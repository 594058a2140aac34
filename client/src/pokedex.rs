//! A query engine wired to a favorites store

use std::sync::{Arc, Weak};

use pokedex_catalog::{
    CatalogEntry, CatalogError, EngineConfig, EntryId, EvolutionSource, FavoriteChange,
    FavoritesOverlay, FavoritesStore, FlattenedEvolutionEntry, LoadOutcome, PageSource,
    QueryEngine, QueryState, Type, flatten,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

pub type CatalogEngine<S, F> = QueryEngine<FavoritesOverlay<S, F>>;

/// List view state for one backend plus its favorites
///
/// Where favorites live depends on the source. A source reporting
/// `owns_favorites` (REST, GraphQL) keeps them server-side: its entries carry
/// the stored flag and changes are sent with `store_favorite`. Any other
/// source (PokeAPI) gets the local store's status stamped onto fetched
/// entries, and every later change to the store is patched into the
/// accumulated list by a background task. Must be created inside a tokio
/// runtime.
pub struct Pokedex<S, F: ?Sized> {
    engine: Arc<CatalogEngine<S, F>>,
    favorites: Arc<F>,
    sync_task: Option<JoinHandle<()>>,
}

impl<S, F> Pokedex<S, F>
where
    S: PageSource + 'static,
    F: FavoritesStore + ?Sized + 'static,
{
    pub fn new(source: S, favorites: Arc<F>) -> Self {
        let engine = QueryEngine::new(
            FavoritesOverlay::new(source, Arc::clone(&favorites)),
            QueryState::new(),
        );
        Self::assemble(engine, favorites)
    }

    pub fn with_config(
        source: S,
        favorites: Arc<F>,
        config: EngineConfig,
    ) -> Result<Self, CatalogError> {
        let engine = QueryEngine::with_config(
            FavoritesOverlay::new(source, Arc::clone(&favorites)),
            QueryState::new(),
            config,
        )?;
        Ok(Self::assemble(engine, favorites))
    }

    fn assemble(engine: CatalogEngine<S, F>, favorites: Arc<F>) -> Self {
        let engine = Arc::new(engine);
        let sync_task = (!engine.source().capabilities().owns_favorites).then(|| {
            tokio::spawn(sync_favorites(
                Arc::downgrade(&engine),
                favorites.subscribe(),
            ))
        });

        Self {
            engine,
            favorites,
            sync_task,
        }
    }

    pub fn engine(&self) -> &CatalogEngine<S, F> {
        &self.engine
    }

    /// The local store; unused for sources that own their favorites
    pub fn favorites(&self) -> &F {
        &self.favorites
    }

    pub fn source(&self) -> &S {
        self.engine.source().inner()
    }

    pub fn owns_favorites(&self) -> bool {
        self.source().capabilities().owns_favorites
    }

    /// Types the source can filter by
    pub async fn types(&self) -> Result<Vec<Type>, CatalogError> {
        Ok(self.source().list_types().await?)
    }

    /// Start a new session for `text` and fetch its first page
    pub async fn search(&self, text: &str) -> Result<LoadOutcome, CatalogError> {
        let mut query = self.engine.query();
        query.text = text.to_string();
        self.restart(query).await
    }

    /// Start a new session for `kind` (None for all types) and fetch its first page
    pub async fn select_type(&self, kind: Option<Type>) -> Result<LoadOutcome, CatalogError> {
        let mut query = self.engine.query();
        query.type_filter = kind;
        self.restart(query).await
    }

    async fn restart(&self, query: QueryState) -> Result<LoadOutcome, CatalogError> {
        self.engine.reset(query);
        self.engine.load_next().await
    }

    /// Switch the favorites-only view; nothing is refetched
    pub fn show_favorites_only(&self, on: bool) {
        self.engine.set_favorites_only(on);
    }

    pub async fn load_more(&self) -> Result<LoadOutcome, CatalogError> {
        self.engine.load_next().await
    }

    pub fn visible_items(&self) -> Vec<CatalogEntry> {
        self.engine.visible_items()
    }

    /// Current favorite status of an entry
    ///
    /// For a source that owns favorites this is the flag of the fetched
    /// entry; an entry not fetched in this session reads as false.
    pub fn is_favorite(&self, id: &EntryId) -> bool {
        if self.owns_favorites() {
            self.engine.get(id).is_some_and(|e| e.is_favorite)
        } else {
            self.favorites.is_favorite(id)
        }
    }

    /// Store a favorite status; returns the status now in effect
    ///
    /// The accumulated entry is patched as soon as the store accepts the
    /// change, without waiting for a refetch or a change notification.
    pub async fn set_favorite(&self, id: &EntryId, favorite: bool) -> Result<bool, CatalogError> {
        let now = if self.owns_favorites() {
            self.source().store_favorite(id, favorite).await?
        } else {
            self.favorites.set(id, favorite)?;
            favorite
        };
        self.engine.set_favorite(id, now);
        Ok(now)
    }

    /// Flip an entry's favorite status; returns the new status
    pub async fn toggle_favorite(&self, id: &EntryId) -> Result<bool, CatalogError> {
        let current = self.is_favorite(id);
        self.set_favorite(id, !current).await
    }
}

impl<S, F> Pokedex<S, F>
where
    S: PageSource + EvolutionSource + 'static,
    F: FavoritesStore + ?Sized + 'static,
{
    /// Fetch and flatten the evolution chain containing `species`
    pub async fn evolution_chain(
        &self,
        species: &str,
    ) -> Result<Vec<FlattenedEvolutionEntry>, CatalogError> {
        let tree = self.source().fetch_evolution_tree(species).await?;
        flatten(&tree)
    }
}

impl<S, F: ?Sized> Drop for Pokedex<S, F> {
    fn drop(&mut self) {
        if let Some(task) = &self.sync_task {
            task.abort();
        }
    }
}

/// Apply store changes to the engine until either side goes away
async fn sync_favorites<S, F>(
    engine: Weak<CatalogEngine<S, F>>,
    mut changes: broadcast::Receiver<FavoriteChange>,
) where
    S: PageSource,
    F: FavoritesStore + ?Sized,
{
    loop {
        match changes.recv().await {
            Ok(change) => {
                let Some(engine) = engine.upgrade() else {
                    break;
                };
                engine.set_favorite(&change.id, change.is_favorite);
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Missed favorite changes; listed status may be stale");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
