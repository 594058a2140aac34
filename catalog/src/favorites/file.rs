use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::broadcast;

use super::memory::FavoriteSet;
use super::{FavoriteChange, FavoritesStore};
use crate::error::CatalogError;
use crate::types::EntryId;

/// Favorites persisted as a JSON array of ids
///
/// The file is read once on open and rewritten on every change. A failed
/// write leaves the in-memory set unchanged.
pub struct FileFavorites {
    path: PathBuf,
    set: FavoriteSet,
}

impl FileFavorites {
    /// Open (or lazily create) the store at `path`
    ///
    /// A missing file is an empty store; a file that is not a JSON array of
    /// strings is a storage error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let ids = load(&path)?;
        tracing::debug!(path = %path.display(), count = ids.len(), "Loaded favorites");
        Ok(Self {
            set: FavoriteSet::new(ids),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load(path: &Path) -> Result<Vec<EntryId>, CatalogError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(CatalogError::Storage(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )));
        }
    };

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = serde_json::from_str(&text).map_err(|e| {
        CatalogError::Storage(format!("corrupt favorites file {}: {}", path.display(), e))
    })?;
    Ok(ids.into_iter().map(EntryId::from).collect())
}

fn save(path: &Path, ids: &BTreeSet<EntryId>) -> Result<(), CatalogError> {
    let list: Vec<&str> = ids.iter().map(EntryId::as_str).collect();
    let json = serde_json::to_string(&list)
        .map_err(|e| CatalogError::Storage(format!("cannot encode favorites: {}", e)))?;

    // Write then rename so a crash never leaves a truncated file
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to save favorites");
            CatalogError::Storage(format!("cannot write {}: {}", path.display(), e))
        })
}

impl FavoritesStore for FileFavorites {
    fn is_favorite(&self, id: &EntryId) -> bool {
        self.set.contains(id)
    }

    fn set(&self, id: &EntryId, favorite: bool) -> Result<bool, CatalogError> {
        self.set
            .update(id, Some(favorite), |ids| save(&self.path, ids))
            .map(|(changed, _)| changed)
    }

    fn toggle(&self, id: &EntryId) -> Result<bool, CatalogError> {
        self.set
            .update(id, None, |ids| save(&self.path, ids))
            .map(|(_, now)| now)
    }

    fn all(&self) -> Vec<EntryId> {
        self.set.all()
    }

    fn subscribe(&self) -> broadcast::Receiver<FavoriteChange> {
        self.set.subscribe()
    }
}
