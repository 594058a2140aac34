//! Print the evolution chain of a species from PokeAPI
//!
//! ```text
//! cargo run --example evolution -- eevee
//! ```

use std::env;

use anyhow::{Context, Result};
use pokedex_catalog::display::format_number;
use pokedex_catalog::{EvolutionSource, flatten};
use pokedex_client::{ClientConfig, PokeApiClient, RetryPolicy};
use pokedex_protocol::pokeapi::POKEAPI_URL;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let species = env::args().nth(1).unwrap_or_else(|| "bulbasaur".to_string());
    let url = env::var("POKEDEX_URL").unwrap_or_else(|_| POKEAPI_URL.to_string());

    let client = PokeApiClient::new(ClientConfig::new(url).with_retry(RetryPolicy::default()))?;

    let tree = client
        .fetch_evolution_tree(&species)
        .await
        .with_context(|| format!("Failed to fetch evolution chain of {}", species))?;
    let chain = flatten(&tree)?;

    println!(
        "{} ({} species, {} stages{})",
        species,
        tree.len(),
        tree.depth(),
        if tree.is_linear() { "" } else { ", branching" }
    );
    let line: Vec<String> = chain
        .iter()
        .map(|e| format!("{} {}", format_number(e.id), e.name))
        .collect();
    println!("{}", line.join(" -> "));

    Ok(())
}
