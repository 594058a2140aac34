//! Capabilities the catalog consumes from an upstream backend

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::evolution::EvolutionNode;
use crate::types::{EntryId, Page, QueryState, Type};

/// Filters a source applies on its side
///
/// A source that filters server-side is expected to report totals that are
/// consistent with the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCapabilities {
    pub filters_type: bool,
    pub filters_text: bool,
    /// Entries arrive with a server-owned favorite flag and changes go
    /// through [`PageSource::store_favorite`]
    pub owns_favorites: bool,
}

/// A paginated catalog backend
///
/// The favorites-only filter is never delegated to the source: favorite
/// status is orthogonal to pagination offsets and is filtered over fetched
/// entries. A source may still own the favorite flag itself.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch `limit` items starting at `offset`
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
        query: &QueryState,
    ) -> Result<Page, FetchError>;

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::default()
    }

    /// Types a type filter can select
    async fn list_types(&self) -> Result<Vec<Type>, FetchError> {
        Ok(Type::ALL.to_vec())
    }

    /// Persist a favorite flag upstream; returns the stored status
    async fn store_favorite(&self, id: &EntryId, _favorite: bool) -> Result<bool, FetchError> {
        Err(FetchError::Unsupported(format!(
            "source does not store favorites (entry {})",
            id
        )))
    }
}

/// A backend able to return a whole evolution tree in one go
#[async_trait]
pub trait EvolutionSource: Send + Sync {
    /// Fetch the evolution tree containing a species, by name or id
    async fn fetch_evolution_tree(&self, species: &str) -> Result<EvolutionNode, FetchError>;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
        query: &QueryState,
    ) -> Result<Page, FetchError> {
        (**self).fetch_page(offset, limit, query).await
    }

    fn capabilities(&self) -> SourceCapabilities {
        (**self).capabilities()
    }

    async fn list_types(&self) -> Result<Vec<Type>, FetchError> {
        (**self).list_types().await
    }

    async fn store_favorite(&self, id: &EntryId, favorite: bool) -> Result<bool, FetchError> {
        (**self).store_favorite(id, favorite).await
    }
}

#[async_trait]
impl<S: EvolutionSource + ?Sized> EvolutionSource for Arc<S> {
    async fn fetch_evolution_tree(&self, species: &str) -> Result<EvolutionNode, FetchError> {
        (**self).fetch_evolution_tree(species).await
    }
}
