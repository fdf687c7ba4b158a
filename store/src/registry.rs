//! One store per collection name.

use crate::{
    error::{Result, StoreError},
    EntityStore,
};
use std::collections::BTreeMap;

/// Named stores sharing one extension type.
#[derive(Debug)]
pub struct StoreRegistry<X = ()> {
    stores: BTreeMap<String, EntityStore<X>>,
}

impl<X> Default for StoreRegistry<X> {
    fn default() -> Self {
        Self {
            stores: BTreeMap::new(),
        }
    }
}

impl<X> StoreRegistry<X> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a store under its own name.
    pub fn register(&mut self, store: EntityStore<X>) -> Result<&mut EntityStore<X>> {
        let name = store.name().to_string();
        if self.stores.contains_key(&name) {
            return Err(StoreError::DuplicateStore(name));
        }

        tracing::debug!(store = %name, "registered store");
        Ok(self.stores.entry(name).or_insert(store))
    }

    pub fn get(&self, name: &str) -> Option<&EntityStore<X>> {
        self.stores.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut EntityStore<X>> {
        self.stores.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<EntityStore<X>> {
        self.stores.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl<X: Default> StoreRegistry<X> {
    /// The store called `name`, defined with default extension state on first use.
    pub fn get_or_define(&mut self, name: &str) -> &mut EntityStore<X> {
        self.stores
            .entry(name.to_string())
            .or_insert_with(|| EntityStore::with_extension(name, X::default()))
    }
}
