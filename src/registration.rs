//! Service registry: raw definitions plus the instance cache.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::class::Instance;
use crate::definition::ServiceDefinition;

/// Definitions by name, and the instances already built from them.
///
/// Definitions never change after construction. The cache only grows: an
/// entry is written once, on the first successful construction of a name.
pub(crate) struct ServiceRegistry {
    definitions: HashMap<String, ServiceDefinition>,
    instances: RwLock<HashMap<String, Instance>>,
}

impl ServiceRegistry {
    pub(crate) fn new(definitions: HashMap<String, ServiceDefinition>) -> Self {
        Self {
            definitions,
            instances: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn definition(&self, name: &str) -> Option<&ServiceDefinition> {
        self.definitions.get(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub(crate) fn definitions(&self) -> impl Iterator<Item = (&str, &ServiceDefinition)> {
        self.definitions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn len(&self) -> usize {
        self.definitions.len()
    }

    pub(crate) fn cached(&self, name: &str) -> Option<Instance> {
        self.instances.read().get(name).cloned()
    }

    pub(crate) fn is_cached(&self, name: &str) -> bool {
        self.instances.read().contains_key(name)
    }

    pub(crate) fn cached_count(&self) -> usize {
        self.instances.read().len()
    }

    /// Caches `instance` unless the name already has one, and returns the
    /// instance that ends up cached.
    pub(crate) fn store(&self, name: &str, instance: Instance) -> Instance {
        self.instances
            .write()
            .entry(name.to_string())
            .or_insert(instance)
            .clone()
    }
}
