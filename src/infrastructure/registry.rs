use std::collections::BTreeMap;

use super::discovery::{KindFetcher, ResourceKind};

/// Registry mapping each resource kind to the fetcher that discovers it
///
/// Adding a new kind to discovery is a single `register` call.
#[derive(Default)]
pub struct DiscoveryRegistry {
    fetchers: BTreeMap<ResourceKind, Box<dyn KindFetcher>>,
}

impl DiscoveryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            fetchers: BTreeMap::new(),
        }
    }

    /// Register a fetcher for a kind, replacing any previous one
    pub fn register(&mut self, kind: ResourceKind, fetcher: Box<dyn KindFetcher>) -> &mut Self {
        self.fetchers.insert(kind, fetcher);
        self
    }

    /// Get the fetcher for a kind
    pub fn get(&self, kind: ResourceKind) -> Option<&dyn KindFetcher> {
        self.fetchers.get(&kind).map(|f| f.as_ref())
    }

    /// Check if a kind has a fetcher
    pub fn has_kind(&self, kind: ResourceKind) -> bool {
        self.fetchers.contains_key(&kind)
    }

    /// Get all registered kinds, in discovery order
    pub fn registered_kinds(&self) -> Vec<ResourceKind> {
        self.fetchers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }
}

/// Builder for creating a configured discovery registry
pub struct DiscoveryRegistryBuilder {
    registry: DiscoveryRegistry,
}

impl DiscoveryRegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: DiscoveryRegistry::new(),
        }
    }

    /// Add a fetcher for a kind
    pub fn with_fetcher(mut self, kind: ResourceKind, fetcher: Box<dyn KindFetcher>) -> Self {
        self.registry.register(kind, fetcher);
        self
    }

    pub fn build(self) -> DiscoveryRegistry {
        self.registry
    }
}

impl Default for DiscoveryRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
