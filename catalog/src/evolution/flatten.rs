//! Pre-order flattening of evolution trees

use super::tree::EvolutionNode;
use crate::display::{artwork_url, format_name};
use crate::error::CatalogError;

/// One entry of a flattened chain, ready for a "previous -> current -> next" display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlattenedEvolutionEntry {
    pub id: u32,
    pub name: String,
    pub image: String,
}

/// Resolve the numeric id at the end of a reference path
///
/// One trailing slash is ignored, so
/// `https://pokeapi.co/api/v2/pokemon-species/25/` and `.../25` both give 25.
/// A bare id (`"025"`) resolves as well.
pub fn resolve_identifier(reference: &str) -> Result<u32, CatalogError> {
    let trimmed = reference.strip_suffix('/').unwrap_or(reference);
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);

    let fail = |reason: &str| CatalogError::Parse {
        reference: reference.to_string(),
        reason: reason.to_string(),
    };

    if segment.is_empty() {
        return Err(fail("no identifier segment"));
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail("identifier segment is not a decimal number"));
    }

    segment
        .parse::<u32>()
        .map_err(|_| fail("identifier out of range"))
}

/// Flatten a tree with the default artwork URL for each entry
pub fn flatten(root: &EvolutionNode) -> Result<Vec<FlattenedEvolutionEntry>, CatalogError> {
    flatten_with(root, artwork_url)
}

/// Flatten a tree depth-first, pre-order, children left to right
///
/// The result has one entry per node. Branches are not preserved: a root with
/// two children yields `[root, child1, child2]`. The first unresolvable
/// reference fails the whole call.
pub fn flatten_with<F>(
    root: &EvolutionNode,
    image_url: F,
) -> Result<Vec<FlattenedEvolutionEntry>, CatalogError>
where
    F: Fn(u32) -> String,
{
    let mut result = Vec::with_capacity(root.len());
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let id = resolve_identifier(&node.species.reference)?;
        result.push(FlattenedEvolutionEntry {
            id,
            name: format_name(&node.species.name),
            image: image_url(id),
        });
        stack.extend(node.children.iter().rev());
    }

    Ok(result)
}
