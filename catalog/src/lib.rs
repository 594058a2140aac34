//! Catalog core for Pokedex front-ends.
//!
//! This crate holds everything a list view and a detail view need that is not
//! rendering: paginated, filtered, deduplicated listing and evolution chain
//! flattening.
//!
//! # Overview
//!
//! `pokedex-catalog` sits between `pokedex-protocol` (wire format) and the
//! backend adapters:
//!
//! ```text
//! pokedex-protocol (wire format)
//!        │
//!        ▼
//! pokedex-catalog (domain types + query engine + flattener) ← THIS CRATE
//!        │
//!        └─> pokedex-client (REST, PokeAPI and GraphQL sources)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`CatalogEntry`] - One listable Pokemon snapshot
//! - [`Page`] - One fetch window over a source
//! - [`QueryState`] - Text query, type filter, favorites-only flag
//! - [`Type`] - The 18 Pokemon types
//!
//! ## Listing
//! - [`QueryEngine`] - Load-more pagination with client-side filtering
//! - [`PageSource`] - The capability a backend provides to the engine
//!
//! ## Evolution
//! - [`EvolutionNode`] - A species evolution tree
//! - [`flatten`] / [`resolve_identifier`] - Pre-order flattening for display
//!
//! ## Favorites
//! - [`FavoritesStore`] - Injected favorites with change notifications
//! - [`FavoritesOverlay`] - Stamps local favorite status onto fetched pages
//!
//! # Example Usage
//!
//! ```ignore
//! use pokedex_catalog::{QueryEngine, QueryState, Type};
//!
//! let engine = QueryEngine::new(source, QueryState::new().with_type(Type::Fire));
//!
//! engine.load_next().await?;
//! for entry in engine.visible_items() {
//!     println!("{} {}", entry.id, entry.name);
//! }
//!
//! if engine.has_more() {
//!     engine.load_next().await?;
//! }
//! ```

pub mod display;
pub mod engine;
pub mod error;
pub mod evolution;
pub mod favorites;
pub mod query;
pub mod source;
pub mod types;

// Re-export main types at crate root for convenience
pub use engine::{DEFAULT_PAGE_SIZE, EngineConfig, LoadOutcome, LoadStatus, QueryEngine};
pub use error::{CatalogError, ErrorKind, FetchError};
pub use evolution::{
    EvolutionNode, FlattenedEvolutionEntry, SpeciesRef, flatten, flatten_with, resolve_identifier,
};
pub use favorites::{
    FavoriteChange, FavoritesOverlay, FavoritesStore, FileFavorites, MemoryFavorites,
};
pub use source::{EvolutionSource, PageSource, SourceCapabilities};
pub use types::{BaseStats, CatalogEntry, EntryId, Page, QueryState, Stat, Type};
