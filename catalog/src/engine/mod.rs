//! Paginated query sessions
//!
//! A [`QueryEngine`] turns fixed-size pages from a [`PageSource`](crate::PageSource)
//! into one deduplicated, filterable list for a single [`QueryState`](crate::QueryState)
//! at a time.

mod query_engine;
mod session;
mod status;

pub use query_engine::{DEFAULT_PAGE_SIZE, EngineConfig, QueryEngine};
pub use status::{LoadOutcome, LoadStatus};
