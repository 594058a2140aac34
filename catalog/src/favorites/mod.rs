//! Favorites store
//!
//! Favorite status is owned by an explicitly injected store rather than
//! ambient global storage. Changes are published on a broadcast channel that
//! the composing layer subscribes to.

mod file;
mod memory;
mod overlay;

use tokio::sync::broadcast;

use crate::error::CatalogError;
use crate::types::EntryId;

pub use file::FileFavorites;
pub use memory::MemoryFavorites;
pub use overlay::FavoritesOverlay;

/// Capacity of the change channel; slow subscribers see `Lagged`
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Published whenever an entry's favorite status actually changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteChange {
    pub id: EntryId,
    pub is_favorite: bool,
}

pub trait FavoritesStore: Send + Sync {
    fn is_favorite(&self, id: &EntryId) -> bool;

    /// Set the status; returns true if it changed
    fn set(&self, id: &EntryId, favorite: bool) -> Result<bool, CatalogError>;

    /// Flip the status; returns the new status
    fn toggle(&self, id: &EntryId) -> Result<bool, CatalogError>;

    /// All favorited ids, sorted
    fn all(&self) -> Vec<EntryId>;

    /// Receive every subsequent change
    fn subscribe(&self) -> broadcast::Receiver<FavoriteChange>;
}
