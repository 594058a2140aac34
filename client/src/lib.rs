//! Backends for the Pokedex catalog
//!
//! Three upstreams implement [`PageSource`] and [`EvolutionSource`]:
//!
//! - [`RestClient`] - the Pokedex REST API, filtering server-side
//! - [`PokeApiClient`] - the public PokeAPI, hydrating list pages concurrently
//! - [`GraphqlClient`] - the Pokedex GraphQL endpoint, filtering server-side
//!
//! [`Pokedex`] wires any of them to a favorites store.
//!
//! ```ignore
//! use std::sync::Arc;
//! use pokedex_client::{Pokedex, PokeApiClient};
//! use pokedex_catalog::MemoryFavorites;
//!
//! let pokedex = Pokedex::new(PokeApiClient::public()?, Arc::new(MemoryFavorites::new()));
//! pokedex.load_more().await?;
//! for entry in pokedex.visible_items() {
//!     println!("{} {}", entry.id, entry.name);
//! }
//! ```

mod config;
mod http;
mod pokedex;

pub mod graphql;
pub mod pokeapi;
pub mod rest;

pub use config::{ClientConfig, RetryPolicy};
pub use graphql::GraphqlClient;
pub use http::HttpTransport;
pub use pokeapi::PokeApiClient;
pub use pokedex::{CatalogEngine, Pokedex};
pub use rest::RestClient;

pub use pokedex_catalog::{EvolutionSource, PageSource};
