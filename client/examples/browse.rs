//! Page through a catalog backend
//!
//! ```text
//! POKEDEX_BACKEND=pokeapi|rest|graphql   (default pokeapi)
//! POKEDEX_URL=<base url>                 (default per backend)
//! POKEDEX_QUERY=char POKEDEX_TYPE=fire   (optional filters)
//! POKEDEX_PAGES=3                        (pages to load)
//! POKEDEX_FAVORITES=favorites.json       (optional persisted favorites)
//! POKEDEX_TOGGLE=25                      (flip a loaded entry's favorite)
//! RUST_LOG=pokedex_catalog=debug
//! ```

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use pokedex_catalog::display::format_number;
use pokedex_catalog::{
    EntryId, FavoritesStore, FileFavorites, MemoryFavorites, PageSource, Type,
};
use pokedex_client::{ClientConfig, GraphqlClient, PokeApiClient, Pokedex, RestClient};
use pokedex_protocol::pokeapi::POKEAPI_URL;
use tracing_subscriber::EnvFilter;

fn backend() -> Result<Arc<dyn PageSource>> {
    let kind = env::var("POKEDEX_BACKEND").unwrap_or_else(|_| "pokeapi".to_string());
    let url = env::var("POKEDEX_URL").ok();

    let source: Arc<dyn PageSource> = match kind.as_str() {
        "pokeapi" => Arc::new(PokeApiClient::new(ClientConfig::new(
            url.unwrap_or_else(|| POKEAPI_URL.to_string()),
        ))?),
        "rest" => Arc::new(RestClient::new(ClientConfig::new(
            url.context("POKEDEX_URL is required for the rest backend")?,
        ))?),
        "graphql" => Arc::new(GraphqlClient::new(ClientConfig::new(
            url.context("POKEDEX_URL is required for the graphql backend")?,
        ))?),
        other => bail!("Unknown backend {:?}", other),
    };
    Ok(source)
}

fn favorites() -> Result<Arc<dyn FavoritesStore>> {
    Ok(match env::var("POKEDEX_FAVORITES") {
        Ok(path) => Arc::new(FileFavorites::open(path)?),
        Err(_) => Arc::new(MemoryFavorites::new()),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pokedex = Pokedex::new(backend()?, favorites()?);

    let text = env::var("POKEDEX_QUERY").unwrap_or_default();
    let kind = match env::var("POKEDEX_TYPE") {
        Ok(name) => {
            let kind = name.parse::<Type>()?;
            let known = pokedex.types().await.context("Failed to list types")?;
            if !known.contains(&kind) {
                bail!("Backend has no {} type (known: {:?})", kind, known);
            }
            Some(kind)
        }
        Err(_) => None,
    };
    let pages: usize = match env::var("POKEDEX_PAGES") {
        Ok(n) => n.parse().context("POKEDEX_PAGES must be a number")?,
        Err(_) => 1,
    };

    pokedex.select_type(kind).await?;
    if !text.is_empty() {
        pokedex.search(&text).await?;
    }
    for _ in 1..pages {
        if !pokedex.engine().has_more() {
            break;
        }
        pokedex.load_more().await?;
    }

    if let Ok(id) = env::var("POKEDEX_TOGGLE") {
        let id = EntryId::from(id);
        let now = pokedex
            .toggle_favorite(&id)
            .await
            .with_context(|| format!("Failed to toggle favorite {}", id))?;
        println!("{} is {}a favorite", id, if now { "now " } else { "no longer " });
    }

    for entry in pokedex.visible_items() {
        let number = entry.number.map(format_number).unwrap_or_default();
        let types: Vec<&str> = entry.types().iter().map(Type::as_str).collect();
        let star = if entry.is_favorite { "*" } else { " " };
        println!("{} {:>5} {:<16} {}", star, number, entry.name, types.join("/"));
    }

    println!(
        "\n{} shown, {} fetched, status {:?}, more: {}",
        pokedex.visible_items().len(),
        pokedex.engine().accumulated_len(),
        pokedex.engine().status(),
        pokedex.engine().has_more()
    );

    Ok(())
}
