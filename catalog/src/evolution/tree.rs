//! Evolution tree nodes

use pokedex_protocol::pokeapi::ChainLink;

/// Reference to a species: its name and an opaque reference string whose
/// last path segment is the numeric id (a PokeAPI species URL, or a bare id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesRef {
    pub name: String,
    pub reference: String,
}

impl SpeciesRef {
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }
}

/// One node of a species evolution tree
///
/// Rooted at the base form; children are the forms it evolves into, in
/// upstream order. Cycles are not checked locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionNode {
    pub species: SpeciesRef,
    pub children: Vec<EvolutionNode>,
}

impl EvolutionNode {
    /// A node without children
    pub fn leaf(species: SpeciesRef) -> Self {
        Self {
            species,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: EvolutionNode) -> Self {
        self.children.push(child);
        self
    }

    /// Build a non-branching chain, first element as root
    ///
    /// Returns None for an empty iterator.
    pub fn linear(chain: impl IntoIterator<Item = SpeciesRef>) -> Option<Self> {
        let species: Vec<SpeciesRef> = chain.into_iter().collect();
        let mut iter = species.into_iter().rev();
        let mut node = EvolutionNode::leaf(iter.next()?);
        for parent in iter {
            node = EvolutionNode::leaf(parent).with_child(node);
        }
        Some(node)
    }

    /// Convert a PokeAPI chain link (and its descendants)
    pub fn from_pokeapi(link: &ChainLink) -> Self {
        Self {
            species: SpeciesRef::new(link.species.name.clone(), link.species.url.clone()),
            children: link.evolves_to.iter().map(Self::from_pokeapi).collect(),
        }
    }

    /// Total number of nodes in the tree
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(EvolutionNode::len).sum::<usize>()
    }

    /// A tree always has its root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of levels; a lone root has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(EvolutionNode::depth).max().unwrap_or(0)
    }

    /// True if no node has more than one child
    pub fn is_linear(&self) -> bool {
        self.children.len() <= 1 && self.children.iter().all(EvolutionNode::is_linear)
    }

    /// Find the node for a species name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&EvolutionNode> {
        if self.species.name.eq_ignore_ascii_case(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}
