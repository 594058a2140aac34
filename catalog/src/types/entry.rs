//! Catalog entries

use std::fmt;

use pokedex_protocol::{ParseError, graphql, pokeapi, rest};

use super::pokemon_type::{Type, parse_types};
use super::stats::BaseStats;
use crate::display::artwork_url;
use crate::error::CatalogError;

/// Stable identifier of a catalog entry
///
/// The REST and GraphQL backends use opaque strings ("001"); PokeAPI ids are
/// numeric and stored as their decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u32> for EntryId {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

/// One listable Pokemon
///
/// Entries are immutable snapshots of what the source reported at fetch time.
/// Two entries are the same catalog item iff their ids are equal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "EntryRecord")
)]
pub struct CatalogEntry {
    pub id: EntryId,

    /// National dex number, when the source reports one
    pub number: Option<u32>,

    /// Display name as reported upstream
    pub name: String,

    /// Type tags, never empty; the first is the primary type
    types: Vec<Type>,

    /// Image URL
    pub image: String,

    pub is_favorite: bool,

    pub stats: BaseStats,
}

/// Unchecked serialized form of [`CatalogEntry`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct EntryRecord {
    id: EntryId,
    number: Option<u32>,
    name: String,
    types: Vec<Type>,
    image: String,
    is_favorite: bool,
    stats: BaseStats,
}

#[cfg(feature = "serde")]
impl TryFrom<EntryRecord> for CatalogEntry {
    type Error = CatalogError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let mut entry = Self::new(record.id, record.name, record.types)?;
        entry.number = record.number;
        entry.image = record.image;
        entry.is_favorite = record.is_favorite;
        entry.stats = record.stats;
        Ok(entry)
    }
}

impl CatalogEntry {
    /// Create an entry; fails if `types` is empty
    pub fn new(
        id: impl Into<EntryId>,
        name: impl Into<String>,
        types: Vec<Type>,
    ) -> Result<Self, CatalogError> {
        if types.is_empty() {
            return Err(CatalogError::InvariantViolation(
                "catalog entry needs at least one type".to_string(),
            ));
        }
        Ok(Self {
            id: id.into(),
            number: None,
            name: name.into(),
            types,
            image: String::new(),
            is_favorite: false,
            stats: BaseStats::default(),
        })
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_stats(mut self, stats: BaseStats) -> Self {
        self.stats = stats;
        self
    }

    /// Copy of this snapshot with a different favorite flag
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    pub fn primary_type(&self) -> Type {
        self.types[0]
    }

    pub fn has_type(&self, t: Type) -> bool {
        self.types.contains(&t)
    }

    /// Create from a REST list item
    pub fn from_rest(pokemon: &rest::Pokemon) -> Result<Self, ParseError> {
        let types = required_types(&pokemon.name, pokemon.types.iter().map(String::as_str))?;
        Ok(Self {
            id: EntryId::new(pokemon.id.clone()),
            number: pokemon.number,
            name: pokemon.name.clone(),
            types,
            image: pokemon.image.clone(),
            is_favorite: pokemon.is_favorite,
            stats: BaseStats {
                max_cp: pokemon.max_cp,
                max_hp: pokemon.max_hp,
                ..Default::default()
            },
        })
    }

    /// Create from a GraphQL `Pokemon`
    pub fn from_graphql(pokemon: &graphql::Pokemon) -> Result<Self, ParseError> {
        let types = required_types(&pokemon.name, pokemon.types.iter().map(String::as_str))?;
        Ok(Self {
            id: EntryId::new(pokemon.id.clone()),
            number: pokemon.number,
            name: pokemon.name.clone(),
            types,
            image: pokemon.image.clone(),
            is_favorite: pokemon.is_favorite,
            stats: BaseStats {
                max_cp: pokemon.max_cp,
                max_hp: pokemon.max_hp,
                ..Default::default()
            },
        })
    }

    /// Create from a PokeAPI `/pokemon/{name}` record
    ///
    /// PokeAPI has no notion of favorites; the flag starts false and is
    /// stamped later by a favorites overlay.
    pub fn from_pokeapi(pokemon: &pokeapi::Pokemon) -> Result<Self, ParseError> {
        let types = required_types(&pokemon.name, pokemon.type_names())?;
        let image = pokemon
            .sprites
            .best_image()
            .map(str::to_string)
            .unwrap_or_else(|| artwork_url(pokemon.id));

        Ok(Self {
            id: EntryId::from(pokemon.id),
            number: Some(pokemon.id),
            name: pokemon.name.clone(),
            types,
            image,
            is_favorite: false,
            stats: BaseStats::from_pokeapi(&pokemon.stats),
        })
    }
}

fn required_types<'a>(
    name: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<Type>, ParseError> {
    let types = parse_types(names);
    if types.is_empty() {
        return Err(ParseError::MissingField(format!("types of {}", name)));
    }
    Ok(types)
}
