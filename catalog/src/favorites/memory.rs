use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;

use super::{CHANGE_CHANNEL_CAPACITY, FavoriteChange, FavoritesStore};
use crate::error::CatalogError;
use crate::types::EntryId;

/// Set of favorited ids plus its change channel
///
/// Shared by the in-memory and file-backed stores.
pub(crate) struct FavoriteSet {
    ids: Mutex<BTreeSet<EntryId>>,
    changes: broadcast::Sender<FavoriteChange>,
}

impl FavoriteSet {
    pub fn new(ids: impl IntoIterator<Item = EntryId>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            ids: Mutex::new(ids.into_iter().collect()),
            changes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<EntryId>> {
        // The set is only replaced after a successful persist, so it is never half-updated
        self.ids.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.lock().contains(id)
    }

    /// Apply a change under the lock; `persist` sees the new set and can veto
    /// it by failing, in which case the current set is kept.
    ///
    /// `target` None toggles. Returns (changed, new status).
    pub fn update<P>(
        &self,
        id: &EntryId,
        target: Option<bool>,
        persist: P,
    ) -> Result<(bool, bool), CatalogError>
    where
        P: FnOnce(&BTreeSet<EntryId>) -> Result<(), CatalogError>,
    {
        let mut ids = self.lock();

        let current = ids.contains(id);
        let wanted = target.unwrap_or(!current);
        if wanted == current {
            return Ok((false, current));
        }

        let mut next = ids.clone();
        if wanted {
            next.insert(id.clone());
        } else {
            next.remove(id);
        }
        persist(&next)?;
        *ids = next;
        drop(ids);

        tracing::debug!(id = %id, is_favorite = wanted, "Favorite changed");
        // No subscribers is fine
        let _ = self.changes.send(FavoriteChange {
            id: id.clone(),
            is_favorite: wanted,
        });
        Ok((true, wanted))
    }

    pub fn all(&self) -> Vec<EntryId> {
        self.lock().iter().cloned().collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FavoriteChange> {
        self.changes.subscribe()
    }
}

/// Favorites kept in process memory only
pub struct MemoryFavorites {
    set: FavoriteSet,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::with_ids(std::iter::empty())
    }

    /// Start with some ids already favorited
    pub fn with_ids(ids: impl IntoIterator<Item = EntryId>) -> Self {
        Self {
            set: FavoriteSet::new(ids),
        }
    }
}

impl Default for MemoryFavorites {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesStore for MemoryFavorites {
    fn is_favorite(&self, id: &EntryId) -> bool {
        self.set.contains(id)
    }

    fn set(&self, id: &EntryId, favorite: bool) -> Result<bool, CatalogError> {
        self.set
            .update(id, Some(favorite), |_| Ok(()))
            .map(|(changed, _)| changed)
    }

    fn toggle(&self, id: &EntryId) -> Result<bool, CatalogError> {
        self.set.update(id, None, |_| Ok(())).map(|(_, now)| now)
    }

    fn all(&self) -> Vec<EntryId> {
        self.set.all()
    }

    fn subscribe(&self) -> broadcast::Receiver<FavoriteChange> {
        self.set.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> EntryId {
        EntryId::from(s)
    }

    #[test]
    fn test_set_and_query() {
        let store = MemoryFavorites::new();

        assert!(!store.is_favorite(&id("25")));
        assert!(store.set(&id("25"), true).unwrap());
        assert!(store.is_favorite(&id("25")));

        // Setting the same status again is not a change
        assert!(!store.set(&id("25"), true).unwrap());
    }

    #[test]
    fn test_toggle_multiple_times() {
        let store = MemoryFavorites::new();

        assert!(store.toggle(&id("25")).unwrap());
        assert!(store.is_favorite(&id("25")));
        assert!(!store.toggle(&id("25")).unwrap());
        assert!(!store.is_favorite(&id("25")));
        assert!(store.toggle(&id("25")).unwrap());
    }

    #[test]
    fn test_all_is_sorted_without_duplicates() {
        let store = MemoryFavorites::with_ids(vec![id("150"), id("1")]);
        store.set(&id("25"), true).unwrap();
        store.set(&id("25"), true).unwrap();
        store.set(&id("150"), false).unwrap();

        assert_eq!(store.all(), vec![id("1"), id("25")]);
    }

    #[test]
    fn test_subscribers_see_changes_only() {
        let store = MemoryFavorites::new();
        let mut rx = store.subscribe();

        store.set(&id("4"), true).unwrap();
        store.set(&id("4"), true).unwrap();
        store.toggle(&id("4")).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            FavoriteChange {
                id: id("4"),
                is_favorite: true
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            FavoriteChange {
                id: id("4"),
                is_favorite: false
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_set_survives_panicking_persist() {
        let set = FavoriteSet::new([id("1")]);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            set.update(&id("2"), Some(true), |_| panic!("disk gone"))
        }));
        assert!(result.is_err());

        // Lock is poisoned but the set is intact and still usable
        assert!(set.contains(&id("1")));
        assert!(!set.contains(&id("2")));
        assert_eq!(set.all(), vec![id("1")]);
        assert_eq!(set.update(&id("2"), Some(true), |_| Ok(())).unwrap(), (true, true));
        assert_eq!(set.all(), vec![id("1"), id("2")]);
    }

    #[test]
    fn test_failed_persist_keeps_set() {
        let set = FavoriteSet::new([id("1")]);

        let err = set
            .update(&id("1"), None, |_| {
                Err(CatalogError::Storage("read-only".to_string()))
            })
            .unwrap_err();

        assert!(matches!(err, CatalogError::Storage(_)));
        assert_eq!(set.all(), vec![id("1")]);
    }
}
