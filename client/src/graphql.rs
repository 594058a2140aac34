//! Client for the Pokedex GraphQL endpoint

use anyhow::Result;
use async_trait::async_trait;
use pokedex_catalog::{
    CatalogEntry, EntryId, EvolutionNode, EvolutionSource, FetchError, Page, PageSource,
    QueryState, SourceCapabilities, SpeciesRef, Type,
};
use pokedex_protocol::graphql::{
    self, IdVariables, NameVariables, PokemonFilterInput, PokemonsQueryInput, PokemonsVariables,
    queries,
};
use pokedex_protocol::{GraphqlRequest, GraphqlResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::http::HttpTransport;

/// Operations are POSTed to `base_url` itself
pub struct GraphqlClient {
    http: HttpTransport,
}

impl GraphqlClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpTransport::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    async fn execute<V, T>(
        &self,
        operation_name: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<T, FetchError>
    where
        V: Serialize + Send + Sync,
        T: DeserializeOwned,
    {
        let request = GraphqlRequest {
            query,
            operation_name,
            variables,
        };
        let response: GraphqlResponse<T> = self
            .http
            .post_json(&self.http.config().base_url, &request)
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn pokemon_by_name(&self, name: &str) -> Result<Option<graphql::Pokemon>, FetchError> {
        let data: graphql::PokemonByNameData = self
            .execute(
                "GetPokemonByName",
                queries::GET_POKEMON_BY_NAME,
                NameVariables {
                    name: name.to_string(),
                },
            )
            .await?;
        Ok(data.pokemon_by_name)
    }
}

/// Type names the backend knows, mapped to catalog types in filter order
pub(crate) fn known_types(data: &graphql::PokemonTypesData) -> Vec<Type> {
    let mut types =
        pokedex_catalog::types::parse_types(data.pokemon_types.iter().map(String::as_str));
    types.sort();
    types.dedup();
    types
}

/// Stored status from a favorite mutation result
pub(crate) fn favorite_status(
    id: &EntryId,
    result: &graphql::FavoriteResult,
) -> Result<bool, FetchError> {
    if result.id != id.as_str() {
        return Err(FetchError::Decode(format!(
            "favorite mutation for {} returned {}",
            id, result.id
        )));
    }
    Ok(result.is_favorite)
}

pub(crate) fn list_variables(offset: usize, limit: usize, query: &QueryState) -> PokemonsVariables {
    PokemonsVariables {
        query: PokemonsQueryInput {
            limit: limit as u32,
            offset: offset as u32,
            search: query.search().map(str::to_string),
            filter: PokemonFilterInput {
                kind: query.type_filter.map(|t| t.as_str().to_string()),
                is_favorite: None,
            },
        },
    }
}

pub(crate) fn to_page(connection: &graphql::PokemonConnection) -> Result<Page, FetchError> {
    let items = connection
        .edges
        .iter()
        .map(CatalogEntry::from_graphql)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(
        items,
        connection.offset as usize,
        connection.count as usize,
    ))
}

/// Same single-line shape as the REST detail: previous, self, next
pub(crate) fn pokemon_tree(pokemon: &graphql::Pokemon) -> Option<EvolutionNode> {
    let species = |p: &graphql::Pokemon| SpeciesRef::new(p.name.as_str(), p.id.as_str());

    EvolutionNode::linear(
        pokemon
            .previous_evolutions
            .iter()
            .map(species)
            .chain(std::iter::once(species(pokemon)))
            .chain(pokemon.evolutions.iter().map(species)),
    )
}

#[async_trait]
impl PageSource for GraphqlClient {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
        query: &QueryState,
    ) -> Result<Page, FetchError> {
        let data: graphql::PokemonsData = self
            .execute(
                "GetPokemons",
                queries::GET_POKEMONS,
                list_variables(offset, limit, query),
            )
            .await?;
        to_page(&data.pokemons)
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities {
            filters_type: true,
            filters_text: true,
            owns_favorites: true,
        }
    }

    async fn list_types(&self) -> Result<Vec<Type>, FetchError> {
        let data: graphql::PokemonTypesData = self
            .execute("GetPokemonTypes", queries::GET_POKEMON_TYPES, serde_json::json!({}))
            .await?;
        Ok(known_types(&data))
    }

    /// Run the favorite or unfavorite mutation
    async fn store_favorite(&self, id: &EntryId, favorite: bool) -> Result<bool, FetchError> {
        let variables = IdVariables { id: id.to_string() };

        let result = if favorite {
            let data: graphql::FavoriteData = self
                .execute("FavoritePokemon", queries::FAVORITE_POKEMON, variables)
                .await?;
            data.favorite_pokemon
        } else {
            let data: graphql::UnfavoriteData = self
                .execute("UnfavoritePokemon", queries::UNFAVORITE_POKEMON, variables)
                .await?;
            data.unfavorite_pokemon
        };

        let now = favorite_status(id, &result)?;
        tracing::debug!(id = %id, is_favorite = now, "Stored favorite");
        Ok(now)
    }
}

#[async_trait]
impl EvolutionSource for GraphqlClient {
    async fn fetch_evolution_tree(&self, species: &str) -> Result<EvolutionNode, FetchError> {
        let pokemon = self
            .pokemon_by_name(species)
            .await?
            .ok_or_else(|| FetchError::NotFound(species.to_string()))?;

        pokemon_tree(&pokemon).ok_or_else(|| FetchError::NotFound(species.to_string()))
    }
}
