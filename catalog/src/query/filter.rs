//! Filter predicates over catalog entries

use crate::source::SourceCapabilities;
use crate::types::{CatalogEntry, QueryState, Type};

/// Keep only favorites when `favorites_only` is set
pub fn matches_favorites(entry: &CatalogEntry, favorites_only: bool) -> bool {
    !favorites_only || entry.is_favorite
}

/// Keep entries carrying the selected type; no selection keeps everything
pub fn matches_type(entry: &CatalogEntry, type_filter: Option<Type>) -> bool {
    type_filter.is_none_or(|t| entry.has_type(t))
}

/// Case-insensitive substring match on the name, or exact match on the id
pub fn matches_text(entry: &CatalogEntry, text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return true;
    }
    entry.id.as_str() == text || entry.name.to_lowercase().contains(&text.to_lowercase())
}

/// Which filters still have to run client-side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPlan {
    pub client_type: bool,
    pub client_text: bool,
}

impl FilterPlan {
    /// Everything client-side
    pub fn client_only() -> Self {
        Self {
            client_type: true,
            client_text: true,
        }
    }

    /// Skip whatever the source already filters
    pub fn for_source(caps: SourceCapabilities) -> Self {
        Self {
            client_type: !caps.filters_type,
            client_text: !caps.filters_text,
        }
    }
}

impl Default for FilterPlan {
    fn default() -> Self {
        Self::client_only()
    }
}

/// Apply favorites, then type, then text filters, preserving order
pub fn apply_filters<'a>(
    entries: impl IntoIterator<Item = &'a CatalogEntry>,
    query: &QueryState,
    plan: FilterPlan,
) -> Vec<CatalogEntry> {
    entries
        .into_iter()
        .filter(|e| matches_favorites(e, query.favorites_only))
        .filter(|e| !plan.client_type || matches_type(e, query.type_filter))
        .filter(|e| !plan.client_text || matches_text(e, &query.text))
        .cloned()
        .collect()
}
