//! Client-side filter predicates
//!
//! The query engine composes these over the accumulated entries of a session.
//! Favorites are always filtered here; type and text filters only when the
//! source does not already apply them.

mod filter;

pub use filter::{FilterPlan, apply_filters, matches_favorites, matches_text, matches_type};
