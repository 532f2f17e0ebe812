//! The set of particle collections belonging to one simulation.

use crate::collection::ParticleCollection;
use indexmap::IndexMap;
use silt_core::SchemaError;

/// Named particle collections, in registration order.
///
/// Registration order is preserved for deterministic iteration; output
/// consumers see collections in the order they were created at setup.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    collections: IndexMap<String, ParticleCollection>,
}

impl ParticleSystem {
    /// Create an empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection under its own name.
    ///
    /// Duplicate names are a configuration error.
    pub fn add(&mut self, collection: ParticleCollection) -> Result<(), SchemaError> {
        let name = collection.name().to_string();
        if self.collections.contains_key(&name) {
            return Err(SchemaError::DuplicateCollection { name });
        }
        self.collections.insert(name, collection);
        Ok(())
    }

    /// Look up a collection by name.
    pub fn collection(&self, name: &str) -> Result<&ParticleCollection, SchemaError> {
        self.collections
            .get(name)
            .ok_or_else(|| SchemaError::UnknownCollection {
                name: name.to_string(),
            })
    }

    /// Mutably look up a collection by name.
    pub fn collection_mut(&mut self, name: &str) -> Result<&mut ParticleCollection, SchemaError> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| SchemaError::UnknownCollection {
                name: name.to_string(),
            })
    }

    /// Whether a collection with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Number of registered collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether no collections are registered.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Registered collection names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Iterate over collections in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParticleCollection> {
        self.collections.values()
    }

    /// Iterate mutably over collections in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ParticleCollection> {
        self.collections.values_mut()
    }
}
