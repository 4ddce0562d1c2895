//! Ordered provider registry.
//!
//! Registration order matters: the router falls back to the first registered
//! adapter when neither the request nor the defaults name a usable one.
//!
//! ```rust
//! use pprovider::ProviderRegistry;
//!
//! let registry = ProviderRegistry::new();
//! assert!(registry.is_empty());
//! assert!(registry.first().is_none());
//! ```

use std::sync::Arc;

use crate::{ProviderAdapter, ProviderId};

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    adapters: Vec<(ProviderId, Arc<dyn ProviderAdapter>)>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A>(&mut self, adapter: A)
    where
        A: ProviderAdapter + 'static,
    {
        self.register_arc(Arc::new(adapter));
    }

    /// Re-registering an id swaps the adapter but keeps its original position.
    pub fn register_arc(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        let id = adapter.id();
        match self.adapters.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = adapter,
            None => self.adapters.push((id, adapter)),
        }
    }

    pub fn get(&self, provider_id: ProviderId) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters
            .iter()
            .find(|(id, _)| *id == provider_id)
            .map(|(_, adapter)| Arc::clone(adapter))
    }

    pub fn remove(&mut self, provider_id: ProviderId) -> Option<Arc<dyn ProviderAdapter>> {
        let index = self.adapters.iter().position(|(id, _)| *id == provider_id)?;
        Some(self.adapters.remove(index).1)
    }

    pub fn contains(&self, provider_id: ProviderId) -> bool {
        self.adapters.iter().any(|(id, _)| *id == provider_id)
    }

    pub fn first(&self) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.first().map(|(_, adapter)| Arc::clone(adapter))
    }

    pub fn ids(&self) -> Vec<ProviderId> {
        self.adapters.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("adapters", &self.ids())
            .finish()
    }
}
