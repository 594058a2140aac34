//! Wire types for the custom Pokedex REST API
//!
//! ```text
//! GET  /pokemon?limit=20&offset=0&query=char&type=Fire
//! GET  /pokemon/{id}
//! POST /pokemon/{id}/favorite
//! POST /pokemon/{id}/unfavorite
//! ```

use serde::Deserialize;

/// Minimum/maximum range as reported by the API (e.g. "6.04kg")
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dimension {
    pub minimum: String,
    pub maximum: String,
}

/// List item returned by `GET /pokemon`
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
    pub is_favorite: bool,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, rename = "maxCP")]
    pub max_cp: Option<u32>,
    #[serde(default, rename = "maxHP")]
    pub max_hp: Option<u32>,
}

/// Full record returned by `GET /pokemon/{id}` and the favorite endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonDetail {
    #[serde(flatten)]
    pub pokemon: Pokemon,
    #[serde(default)]
    pub weight: Option<Dimension>,
    #[serde(default)]
    pub height: Option<Dimension>,
    #[serde(default)]
    pub evolutions: Vec<Pokemon>,
    #[serde(default)]
    pub previous_evolutions: Vec<Pokemon>,
    #[serde(default)]
    pub sound: Option<String>,
}

/// Response of `GET /pokemon`
///
/// `count` is the total number of matches, not the number of items in this page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListResponse {
    pub limit: u32,
    pub offset: u32,
    pub count: u32,
    pub items: Vec<Pokemon>,
}
