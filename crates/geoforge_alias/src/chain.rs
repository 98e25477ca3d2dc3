//! Resolution chain used for cycle and depth guarding.

use geoforge_core::AliasName;

/// Maximum number of alias-to-alias hops in a single resolution
pub const MAX_CHAIN_DEPTH: usize = 5;

/// One alias whose target is being expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    /// Reference text as written
    pub reference: String,
    /// Bare alias name the reference points at
    pub alias: AliasName,
}

/// Aliases currently being expanded during one top-level resolution
///
/// Each recursion frame works on its own extended copy, so sibling sub-path
/// components never see each other's links. Cycles are detected by bare
/// alias name: re-entering an alias whose expansion is still in progress is a
/// cycle regardless of the sub-path it was reached with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionChain {
    links: Vec<ChainLink>,
}

impl ResolutionChain {
    /// Create an empty chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy this chain with one more link appended
    #[must_use]
    pub fn extended(&self, reference: &str, alias: &AliasName) -> Self {
        let mut links = Vec::with_capacity(self.links.len() + 1);
        links.extend(self.links.iter().cloned());
        links.push(ChainLink {
            reference: reference.to_string(),
            alias: alias.clone(),
        });
        Self { links }
    }

    /// Check whether an alias is already being expanded
    #[must_use]
    pub fn contains_alias(&self, alias: &AliasName) -> bool {
        self.links.iter().any(|link| &link.alias == alias)
    }

    /// Number of aliases currently being expanded
    #[must_use]
    pub fn depth(&self) -> usize {
        self.links.len()
    }

    /// Check if the chain is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links in visiting order
    #[must_use]
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    /// References in visiting order, for diagnostics
    #[must_use]
    pub fn references(&self) -> Vec<String> {
        self.links.iter().map(|link| link.reference.clone()).collect()
    }

    /// References in visiting order followed by `last`
    #[must_use]
    pub fn references_with(&self, last: &str) -> Vec<String> {
        let mut refs = self.references();
        refs.push(last.to_string());
        refs
    }
}
