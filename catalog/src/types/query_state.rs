//! What subset of the catalog is being viewed

use super::pokemon_type::Type;

/// Text query, type filter and favorites-only flag
///
/// Two states are equivalent iff all three fields match; equivalence is the
/// session key of the query engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryState {
    /// Free-text query, possibly empty
    pub text: String,

    /// Selected type, None for "All"
    pub type_filter: Option<Type>,

    pub favorites_only: bool,
}

impl QueryState {
    /// The unfiltered catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_type(mut self, t: Type) -> Self {
        self.type_filter = Some(t);
        self
    }

    pub fn favorites_only(mut self, on: bool) -> Self {
        self.favorites_only = on;
        self
    }

    /// Trimmed text query, None when blank
    pub fn search(&self) -> Option<&str> {
        let text = self.text.trim();
        if text.is_empty() { None } else { Some(text) }
    }

    /// True if no filter of any kind is active
    pub fn is_unfiltered(&self) -> bool {
        self.search().is_none() && self.type_filter.is_none() && !self.favorites_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equivalence_uses_all_fields() {
        let a = QueryState::new().with_text("char").with_type(Type::Fire);
        let b = QueryState::new().with_text("char").with_type(Type::Fire);
        let c = b.clone().favorites_only(true);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_search_is_trimmed() {
        assert_eq!(QueryState::new().with_text("  pika ").search(), Some("pika"));
        assert_eq!(QueryState::new().with_text("   ").search(), None);
        assert!(QueryState::new().with_text("   ").is_unfiltered());
        assert!(!QueryState::new().favorites_only(true).is_unfiltered());
    }
}
