//! GraphQL envelope and types for the Pokedex GraphQL endpoint

pub mod queries;

use serde::{Deserialize, Serialize};

use crate::ParseError;
use crate::rest::Dimension;

/// POST body of a GraphQL operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<V> {
    pub query: &'static str,
    pub operation_name: &'static str,
    pub variables: V,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// Response envelope: `{ "data": ..., "errors": [...] }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl<T> GraphqlResponse<T> {
    /// Unwrap the data payload, turning reported errors into a ParseError
    pub fn into_data(self) -> Result<T, ParseError> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(ParseError::InvalidFormat(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| ParseError::MissingField("data".to_string()))
    }
}

/// `PokemonsQueryInput` argument of the `pokemons` query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PokemonsQueryInput {
    pub limit: u32,
    pub offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub filter: PokemonFilterInput,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonFilterInput {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokemonsVariables {
    pub query: PokemonsQueryInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameVariables {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdVariables {
    pub id: String,
}

/// Pokemon as selected by the list and detail fragments
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    pub id: String,
    #[serde(default)]
    pub number: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, rename = "maxCP")]
    pub max_cp: Option<u32>,
    #[serde(default, rename = "maxHP")]
    pub max_hp: Option<u32>,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub weight: Option<Dimension>,
    #[serde(default)]
    pub height: Option<Dimension>,
    #[serde(default)]
    pub evolutions: Vec<Pokemon>,
    #[serde(default)]
    pub previous_evolutions: Vec<Pokemon>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PokemonConnection {
    pub limit: u32,
    pub offset: u32,
    pub count: u32,
    pub edges: Vec<Pokemon>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PokemonsData {
    pub pokemons: PokemonConnection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonByNameData {
    pub pokemon_by_name: Option<Pokemon>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonTypesData {
    pub pokemon_types: Vec<String>,
}

/// Subset of fields returned by the favorite mutations
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResult {
    pub id: String,
    pub name: String,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteData {
    pub favorite_pokemon: FavoriteResult,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnfavoriteData {
    #[serde(rename = "unFavoritePokemon")]
    pub unfavorite_pokemon: FavoriteResult,
}
