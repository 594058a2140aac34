//! Wire types for the public PokeAPI (v2)

mod evolution;

use serde::Deserialize;

pub use evolution::{ChainLink, EvolutionChain};

pub const POKEAPI_URL: &str = "https://pokeapi.co/api/v2";

/// `{ name, url }` pair used throughout PokeAPI for links to other resources
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// Response of `GET /pokemon?limit&offset`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListResponse {
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Artwork {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Artwork,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

impl Sprites {
    /// Official artwork if present, falling back to the default front sprite
    pub fn best_image(&self) -> Option<&str> {
        self.other
            .official_artwork
            .front_default
            .as_deref()
            .or(self.front_default.as_deref())
    }
}

/// Response of `GET /pokemon/{name or id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
}

impl Pokemon {
    /// Type names ordered by slot (slot 1 is the primary type)
    pub fn type_names(&self) -> Vec<&str> {
        let mut slots: Vec<&TypeSlot> = self.types.iter().collect();
        slots.sort_by_key(|t| t.slot);
        slots.into_iter().map(|t| t.kind.name.as_str()).collect()
    }
}

/// Response of `GET /pokemon-species/{name or id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Species {
    pub id: u32,
    pub name: String,
    pub evolution_chain: ApiResource,
}

/// Unnamed link to another resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiResource {
    pub url: String,
}

/// Response of `GET /type`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeList {
    pub count: u32,
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeMember {
    pub slot: u8,
    pub pokemon: NamedResource,
}

/// Response of `GET /type/{name}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeDetail {
    pub id: u32,
    pub name: String,
    pub pokemon: Vec<TypeMember>,
}
