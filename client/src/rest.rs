//! Client for the Pokedex REST backend
//!
//! `GET /pokemon?limit&offset&query&type` lists with server-side filtering,
//! `GET /pokemon/{id}` returns a detail record, and favorites are toggled with
//! `POST /pokemon/{id}/favorite` and `/unfavorite`.

use anyhow::Result;
use async_trait::async_trait;
use pokedex_catalog::{
    CatalogEntry, EntryId, EvolutionNode, EvolutionSource, FetchError, Page, PageSource,
    QueryState, SourceCapabilities, SpeciesRef,
};
use pokedex_protocol::rest;

use crate::config::ClientConfig;
use crate::http::HttpTransport;

pub struct RestClient {
    http: HttpTransport,
}

impl RestClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpTransport::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    /// Fetch the detail record of one Pokemon by id
    pub async fn pokemon(&self, id: &str) -> Result<rest::PokemonDetail, FetchError> {
        let url = self.http.url(&format!("pokemon/{}", id));
        self.http.get_json(&url, &[]).await
    }
}

/// Path of the favorite or unfavorite action for `id`
pub(crate) fn favorite_path(id: &EntryId, favorite: bool) -> String {
    let action = if favorite { "favorite" } else { "unfavorite" };
    format!("pokemon/{}/{}", id, action)
}

/// Stored status from the record a favorite action answers with
pub(crate) fn favorite_status(id: &EntryId, pokemon: &rest::Pokemon) -> Result<bool, FetchError> {
    if pokemon.id != id.as_str() {
        return Err(FetchError::Decode(format!(
            "favorite response for {} names {}",
            id, pokemon.id
        )));
    }
    Ok(pokemon.is_favorite)
}

/// Query parameters of a list request
pub(crate) fn list_params(
    offset: usize,
    limit: usize,
    query: &QueryState,
) -> Vec<(&'static str, String)> {
    let mut params = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
    if let Some(text) = query.search() {
        params.push(("query", text.to_string()));
    }
    if let Some(t) = query.type_filter {
        params.push(("type", t.as_str().to_string()));
    }
    params
}

pub(crate) fn to_page(list: &rest::ListResponse) -> Result<Page, FetchError> {
    let items = list
        .items
        .iter()
        .map(CatalogEntry::from_rest)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(items, list.offset as usize, list.count as usize))
}

/// Previous evolutions, the record itself, then later evolutions, as one chain
///
/// The backend only exposes flat lists, so branching families come out as a
/// single line; flattening yields the same order either way.
pub(crate) fn detail_tree(detail: &rest::PokemonDetail) -> Option<EvolutionNode> {
    let species = |p: &rest::Pokemon| SpeciesRef::new(p.name.as_str(), p.id.as_str());

    EvolutionNode::linear(
        detail
            .previous_evolutions
            .iter()
            .map(species)
            .chain(std::iter::once(species(&detail.pokemon)))
            .chain(detail.evolutions.iter().map(species)),
    )
}

#[async_trait]
impl PageSource for RestClient {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
        query: &QueryState,
    ) -> Result<Page, FetchError> {
        let url = self.http.url("pokemon");
        let list: rest::ListResponse = self
            .http
            .get_json(&url, &list_params(offset, limit, query))
            .await?;
        to_page(&list)
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities {
            filters_type: true,
            filters_text: true,
            owns_favorites: true,
        }
    }

    async fn store_favorite(&self, id: &EntryId, favorite: bool) -> Result<bool, FetchError> {
        let url = self.http.url(&favorite_path(id, favorite));
        let pokemon: rest::Pokemon = self.http.post_empty(&url).await?;
        let now = favorite_status(id, &pokemon)?;
        tracing::debug!(id = %id, is_favorite = now, "Stored favorite");
        Ok(now)
    }
}

#[async_trait]
impl EvolutionSource for RestClient {
    /// `species` is the backend id of any member of the family
    async fn fetch_evolution_tree(&self, species: &str) -> Result<EvolutionNode, FetchError> {
        let detail = self.pokemon(species).await?;
        detail_tree(&detail).ok_or_else(|| FetchError::NotFound(species.to_string()))
    }
}
