use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use crate::{BeanError, BeanRef};

/// Fully wired singleton instances keyed by bean name.
///
/// Entries are only ever added. Creation is serialized per bean name, so a
/// singleton is constructed at most once even when it is first requested from
/// several threads at the same time.
#[derive(Default)]
pub(crate) struct InstancePool {
    instances: DashMap<String, BeanRef>,
    guards: DashMap<String, Arc<Mutex<()>>>,
}

impl InstancePool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, name: &str) -> Option<BeanRef> {
        self.instances.get(name).map(|v| v.value().clone())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns the pooled instance of `name`, creating and storing it first if
    /// needed. A failed creation leaves the pool unchanged.
    pub(crate) fn get_or_try_insert_with<F>(&self, name: &str, create: F) -> Result<BeanRef, BeanError>
    where
        F: FnOnce() -> Result<BeanRef, BeanError>,
    {
        if let Some(bean) = self.get(name) {
            tracing::trace!(bean = name, "Singleton served from pool");
            return Ok(bean);
        }
        // Shard locks must not be held while creating, since creation recurses
        // into the pool for dependencies.
        let guard = Arc::clone(&self.guards.entry(name.to_owned()).or_default());
        let _lock = guard.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bean) = self.get(name) {
            return Ok(bean);
        }
        let bean = create()?;
        self.instances.insert(name.to_owned(), bean.clone());
        Ok(bean)
    }
}
