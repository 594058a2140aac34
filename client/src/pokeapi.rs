//! Client for the public PokeAPI
//!
//! PokeAPI lists only names, so every page is hydrated by fetching each
//! detail record concurrently. A type filter is served from the type's member
//! list, sliced by offset; text search stays on the client side.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::try_join_all;
use pokedex_catalog::{
    CatalogEntry, EvolutionNode, EvolutionSource, FetchError, Page, PageSource, QueryState,
    SourceCapabilities, Type,
};
use pokedex_protocol::pokeapi::{self, POKEAPI_URL};

use crate::config::ClientConfig;
use crate::http::HttpTransport;

/// Upper bound for `GET /type`; the API reports about twenty
const TYPE_LIST_LIMIT: usize = 100;

pub struct PokeApiClient {
    http: HttpTransport,
    /// Member names per type, fetched once per client
    type_members: Mutex<HashMap<Type, Arc<Vec<String>>>>,
}

impl PokeApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpTransport::new(config)?,
            type_members: Mutex::new(HashMap::new()),
        })
    }

    /// Client for the public instance at pokeapi.co
    pub fn public() -> Result<Self> {
        Self::new(ClientConfig::new(POKEAPI_URL))
    }

    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    /// Fetch one Pokemon by name or national dex number
    pub async fn pokemon(&self, name_or_id: &str) -> Result<pokeapi::Pokemon, FetchError> {
        let url = self.http.url(&format!("pokemon/{}", name_or_id));
        self.http.get_json(&url, &[]).await
    }

    pub async fn species(&self, name_or_id: &str) -> Result<pokeapi::Species, FetchError> {
        let url = self.http.url(&format!("pokemon-species/{}", name_or_id));
        self.http.get_json(&url, &[]).await
    }

    async fn members_of(&self, t: Type) -> Result<Arc<Vec<String>>, FetchError> {
        if let Some(members) = self.lock_members().get(&t) {
            return Ok(Arc::clone(members));
        }

        let url = self.http.url(&format!("type/{}", t.slug()));
        let detail: pokeapi::TypeDetail = self.http.get_json(&url, &[]).await?;
        let members = Arc::new(member_names(&detail));
        tracing::debug!(kind = %t, count = members.len(), "Fetched type members");

        // A concurrent fetch may have landed first; either copy is equivalent
        self.lock_members().insert(t, Arc::clone(&members));
        Ok(members)
    }

    fn lock_members(&self) -> std::sync::MutexGuard<'_, HashMap<Type, Arc<Vec<String>>>> {
        self.type_members.lock().unwrap_or_else(|e| e.into_inner())
    }

}

/// Fetch every named record concurrently; the first failure fails the batch
pub(crate) async fn hydrate<F, Fut>(
    names: &[String],
    fetch: F,
) -> Result<Vec<CatalogEntry>, FetchError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<pokeapi::Pokemon, FetchError>>,
{
    let records = try_join_all(names.iter().cloned().map(fetch)).await?;
    records
        .iter()
        .map(|p| CatalogEntry::from_pokeapi(p).map_err(FetchError::from))
        .collect()
}

/// Page of a type filter: the member window, hydrated, out of all members
pub(crate) async fn type_page<F, Fut>(
    members: &[String],
    offset: usize,
    limit: usize,
    fetch: F,
) -> Result<Page, FetchError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<pokeapi::Pokemon, FetchError>>,
{
    let items = hydrate(window(members, offset, limit), fetch).await?;
    Ok(Page::new(items, offset, members.len()))
}

/// Page of the unfiltered listing, hydrated from its names
pub(crate) async fn list_page<F, Fut>(
    list: pokeapi::ListResponse,
    offset: usize,
    fetch: F,
) -> Result<Page, FetchError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<pokeapi::Pokemon, FetchError>>,
{
    let names: Vec<String> = list.results.into_iter().map(|r| r.name).collect();
    let items = hydrate(&names, fetch).await?;
    Ok(Page::new(items, offset, list.count as usize))
}

/// Member names of a type, ordered by the API
pub(crate) fn member_names(detail: &pokeapi::TypeDetail) -> Vec<String> {
    detail
        .pokemon
        .iter()
        .map(|member| member.pokemon.name.clone())
        .collect()
}

/// The `[offset, offset + limit)` window of a member list
pub(crate) fn window(members: &[String], offset: usize, limit: usize) -> &[String] {
    let start = offset.min(members.len());
    let end = offset.saturating_add(limit).min(members.len());
    &members[start..end]
}

pub(crate) fn known_types(list: &pokeapi::TypeList) -> Vec<Type> {
    let mut types: Vec<Type> = list
        .results
        .iter()
        .filter_map(|r| Type::from_name(&r.name))
        .collect();
    types.sort();
    types.dedup();
    types
}

#[async_trait]
impl PageSource for PokeApiClient {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
        query: &QueryState,
    ) -> Result<Page, FetchError> {
        let fetch = |name: String| async move { self.pokemon(&name).await };

        if let Some(t) = query.type_filter {
            let members = self.members_of(t).await?;
            return type_page(&members, offset, limit, fetch).await;
        }

        let url = self.http.url("pokemon");
        let params = [("limit", limit.to_string()), ("offset", offset.to_string())];
        let list: pokeapi::ListResponse = self.http.get_json(&url, &params).await?;
        list_page(list, offset, fetch).await
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities {
            filters_type: true,
            filters_text: false,
            owns_favorites: false,
        }
    }

    /// Catalog types known to the API, in catalog order
    async fn list_types(&self) -> Result<Vec<Type>, FetchError> {
        let url = self.http.url("type");
        let list: pokeapi::TypeList = self
            .http
            .get_json(&url, &[("limit", TYPE_LIST_LIMIT.to_string())])
            .await?;
        Ok(known_types(&list))
    }
}

#[async_trait]
impl EvolutionSource for PokeApiClient {
    async fn fetch_evolution_tree(&self, species: &str) -> Result<EvolutionNode, FetchError> {
        let species = self.species(&species.to_lowercase()).await?;
        let chain: pokeapi::EvolutionChain = self
            .http
            .get_json(&species.evolution_chain.url, &[])
            .await?;

        Ok(EvolutionNode::from_pokeapi(&chain.chain))
    }
}
