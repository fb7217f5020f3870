use super::registry::Registry;

use std::sync::{Arc, PoisonError, RwLock};

/// A swappable reference to the current registry.
///
/// A registry is never modified once built. To reload models, build a new
/// registry and [`replace`](SharedRegistry::replace) the current one; readers
/// holding a [`snapshot`](SharedRegistry::snapshot) keep using the registry
/// they started with.
#[derive(Debug)]
pub struct SharedRegistry {
    current: RwLock<Arc<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> SharedRegistry {
        SharedRegistry {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    /// The registry currently in use
    pub fn snapshot(&self) -> Arc<Registry> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);

        Arc::clone(&current)
    }

    /// Install `registry`, returning the one it replaces
    pub fn replace(&self, registry: Registry) -> Arc<Registry> {
        let registry = Arc::new(registry);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        std::mem::replace(&mut *current, registry)
    }
}
