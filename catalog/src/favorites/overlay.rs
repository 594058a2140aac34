use std::sync::Arc;

use async_trait::async_trait;

use super::FavoritesStore;
use crate::error::FetchError;
use crate::source::{PageSource, SourceCapabilities};
use crate::types::{EntryId, Page, QueryState, Type};

/// Stamps the local favorite status onto every fetched entry
///
/// Meant for sources with no favorites of their own (PokeAPI) so the engine's
/// favorites filter can rely on `CatalogEntry::is_favorite` alone. Pages from
/// a source that reports `owns_favorites` pass through untouched.
pub struct FavoritesOverlay<S, F: ?Sized> {
    inner: S,
    favorites: Arc<F>,
}

impl<S, F: ?Sized> FavoritesOverlay<S, F> {
    pub fn new(inner: S, favorites: Arc<F>) -> Self {
        Self { inner, favorites }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S, F> PageSource for FavoritesOverlay<S, F>
where
    S: PageSource,
    F: FavoritesStore + ?Sized,
{
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
        query: &QueryState,
    ) -> Result<Page, FetchError> {
        let mut page = self.inner.fetch_page(offset, limit, query).await?;
        if self.inner.capabilities().owns_favorites {
            return Ok(page);
        }
        page.items = page
            .items
            .into_iter()
            .map(|entry| {
                let favorite = self.favorites.is_favorite(&entry.id);
                entry.with_favorite(favorite)
            })
            .collect();
        Ok(page)
    }

    fn capabilities(&self) -> SourceCapabilities {
        self.inner.capabilities()
    }

    async fn list_types(&self) -> Result<Vec<Type>, FetchError> {
        self.inner.list_types().await
    }

    async fn store_favorite(&self, id: &EntryId, favorite: bool) -> Result<bool, FetchError> {
        self.inner.store_favorite(id, favorite).await
    }
}
