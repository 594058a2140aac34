use serde::Deserialize;

use super::NamedResource;

/// Response of the evolution-chain URL referenced by a species
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvolutionChain {
    pub id: u32,
    pub chain: ChainLink,
}

/// One node of the evolution tree
///
/// The tree is rooted at the base form. `evolves_to` is usually zero or one
/// link long, but branches (Eevee, Tyrogue, Wurmple) list several.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}
