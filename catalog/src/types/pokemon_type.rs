//! Pokemon type tags

use std::str::FromStr;

use crate::error::CatalogError;

/// Pokemon types (18 types as of Gen 6+)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl Type {
    /// All 18 Pokemon types, in the order type filters list them
    pub const ALL: [Type; 18] = [
        Type::Normal,
        Type::Fire,
        Type::Water,
        Type::Electric,
        Type::Grass,
        Type::Ice,
        Type::Fighting,
        Type::Poison,
        Type::Ground,
        Type::Flying,
        Type::Psychic,
        Type::Bug,
        Type::Rock,
        Type::Ghost,
        Type::Dragon,
        Type::Dark,
        Type::Steel,
        Type::Fairy,
    ];

    /// Parse an upstream type name (case-insensitive)
    ///
    /// PokeAPI reports `"fire"`, the REST and GraphQL backends `"Fire"`.
    /// PokeAPI's placeholder types (`"unknown"`, `"shadow"`) yield `None`.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Some(Type::Normal),
            "fire" => Some(Type::Fire),
            "water" => Some(Type::Water),
            "electric" => Some(Type::Electric),
            "grass" => Some(Type::Grass),
            "ice" => Some(Type::Ice),
            "fighting" => Some(Type::Fighting),
            "poison" => Some(Type::Poison),
            "ground" => Some(Type::Ground),
            "flying" => Some(Type::Flying),
            "psychic" => Some(Type::Psychic),
            "bug" => Some(Type::Bug),
            "rock" => Some(Type::Rock),
            "ghost" => Some(Type::Ghost),
            "dragon" => Some(Type::Dragon),
            "dark" => Some(Type::Dark),
            "steel" => Some(Type::Steel),
            "fairy" => Some(Type::Fairy),
            _ => None,
        }
    }

    /// Canonical capitalized name, as the REST and GraphQL backends expect it
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Normal => "Normal",
            Type::Fire => "Fire",
            Type::Water => "Water",
            Type::Electric => "Electric",
            Type::Grass => "Grass",
            Type::Ice => "Ice",
            Type::Fighting => "Fighting",
            Type::Poison => "Poison",
            Type::Ground => "Ground",
            Type::Flying => "Flying",
            Type::Psychic => "Psychic",
            Type::Bug => "Bug",
            Type::Rock => "Rock",
            Type::Ghost => "Ghost",
            Type::Dragon => "Dragon",
            Type::Dark => "Dark",
            Type::Steel => "Steel",
            Type::Fairy => "Fairy",
        }
    }

    /// Lowercase name, as PokeAPI paths expect it (`/type/fire`)
    pub fn slug(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Type {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::from_name(s).ok_or_else(|| CatalogError::Parse {
            reference: s.to_string(),
            reason: "unknown pokemon type".to_string(),
        })
    }
}

/// Parse a list of upstream type names, keeping upstream order
///
/// Unknown names are skipped; the result is empty only if no name was recognized.
pub fn parse_types<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Type> {
    let mut types = Vec::new();
    for name in names {
        if let Some(t) = Type::from_name(name)
            && !types.contains(&t)
        {
            types.push(t);
        }
    }
    types
}
