//! Evolution chains
//!
//! Trees are fetched whole (one request) and then reshaped synchronously by
//! [`flatten`], so the traversal never touches the network.

mod flatten;
mod tree;

pub use flatten::{FlattenedEvolutionEntry, flatten, flatten_with, resolve_identifier};
pub use tree::{EvolutionNode, SpeciesRef};
