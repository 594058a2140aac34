//! Domain types for the catalog

mod entry;
mod page;
mod pokemon_type;
mod query_state;
mod stats;

pub use entry::{CatalogEntry, EntryId};
pub use page::Page;
pub use pokemon_type::{Type, parse_types};
pub use query_state::QueryState;
pub use stats::{BaseStats, Stat, stat_label};
