use std::collections::{HashMap, HashSet, hash_map};

use crate::bean::BeanFactory;
use crate::{BeanError, Scope, TypeDescriptor, decapitalize};

/// Construction metadata of a single bean.
#[derive(Clone)]
pub struct BeanDefinition {
    type_name: &'static str,
    scope: Scope,
    lazy: bool,
    dependencies: Vec<&'static str>,
    factory: BeanFactory,
}

impl BeanDefinition {
    /// Derives the bean name and definition of an injectable candidate.
    ///
    /// Returns `Ok(None)` for candidates without the injectable marker.
    pub fn from_descriptor(
        descriptor: &TypeDescriptor,
    ) -> Result<Option<(String, BeanDefinition)>, BeanError> {
        let Some(injectable) = descriptor.injectable() else {
            return Ok(None);
        };
        let markers = &injectable.markers;
        let scope = match markers.scope {
            Some(v) => v.parse().map_err(|_| BeanError::InvalidScope {
                type_name: descriptor.type_name(),
                scope: v.to_owned(),
            })?,
            None => Scope::default(),
        };
        let name = match markers.name {
            Some(v) if !v.is_empty() => v.to_owned(),
            _ => decapitalize(descriptor.simple_name()),
        };
        let definition = BeanDefinition {
            type_name: descriptor.type_name(),
            scope,
            lazy: markers.lazy,
            dependencies: (injectable.dependencies)().iter().collect(),
            factory: injectable.factory,
        };
        Ok(Some((name, definition)))
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Laziness only matters for singletons.
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Tests whether the bean is constructed while the container is built.
    pub fn is_eager(&self) -> bool {
        self.scope == Scope::Singleton && !self.lazy
    }

    /// Names of the beans wired into this one, in slot declaration order.
    pub fn dependencies(&self) -> &[&'static str] {
        &self.dependencies
    }

    pub(crate) fn factory(&self) -> BeanFactory {
        self.factory
    }
}

impl std::fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("type_name", &self.type_name)
            .field("scope", &self.scope)
            .field("lazy", &self.lazy)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// What happens when two candidates resolve to the same bean name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with [`BeanError::ConfigurationConflict`].
    #[default]
    Reject,
    /// The later candidate replaces the earlier one.
    LastWins,
}

/// Bean definitions keyed by bean name, in registration order.
pub(crate) struct Registry {
    definitions: HashMap<String, BeanDefinition>,
    order: Vec<String>,
    duplicates: DuplicatePolicy,
    cycles: HashMap<String, Vec<String>>,
}

impl Registry {
    pub(crate) fn new(duplicates: DuplicatePolicy) -> Self {
        Self {
            definitions: HashMap::new(),
            order: Vec::new(),
            duplicates,
            cycles: HashMap::new(),
        }
    }

    pub(crate) fn register(
        &mut self,
        name: String,
        definition: BeanDefinition,
    ) -> Result<(), BeanError> {
        match self.definitions.entry(name) {
            hash_map::Entry::Occupied(mut v) => match self.duplicates {
                DuplicatePolicy::Reject => {
                    return Err(BeanError::ConfigurationConflict {
                        name: v.key().clone(),
                        existing: v.get().type_name,
                        conflicting: definition.type_name,
                    });
                }
                DuplicatePolicy::LastWins => {
                    tracing::warn!(
                        bean = %v.key(),
                        replaced = v.get().type_name,
                        by = definition.type_name,
                        "Bean definition overridden"
                    );
                    v.insert(definition);
                }
            },
            hash_map::Entry::Vacant(v) => {
                tracing::debug!(
                    bean = %v.key(),
                    type_name = definition.type_name,
                    scope = %definition.scope,
                    lazy = definition.lazy,
                    "Bean definition registered"
                );
                self.order.push(v.key().clone());
                v.insert(definition);
            }
        }
        Ok(())
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<&BeanDefinition, BeanError> {
        self.definitions
            .get(name)
            .ok_or_else(|| BeanError::UnknownBean(name.to_owned()))
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns the dependency cycle reachable from `name`, if any.
    pub(crate) fn cycle(&self, name: &str) -> Option<&Vec<String>> {
        self.cycles.get(name)
    }

    /// Records, for every bean, the dependency cycle reachable from it.
    ///
    /// Must be called once after the last registration.
    pub(crate) fn seal(&mut self) {
        let cycles = {
            let mut acyclic = HashSet::new();
            let mut cycles = HashMap::new();
            for name in &self.order {
                let mut path = Vec::new();
                if let Some(chain) = self.find_cycle(name, &mut path, &mut acyclic) {
                    tracing::debug!(bean = %name, chain = %chain.join(" -> "), "Dependency cycle found");
                    cycles.insert(name.clone(), chain);
                }
            }
            cycles
        };
        self.cycles = cycles;
    }

    fn find_cycle<'a>(
        &'a self,
        name: &'a str,
        path: &mut Vec<&'a str>,
        acyclic: &mut HashSet<&'a str>,
    ) -> Option<Vec<String>> {
        if let Some(pos) = path.iter().position(|v| *v == name) {
            let mut chain: Vec<String> = path[pos..].iter().map(|v| v.to_string()).collect();
            chain.push(name.to_owned());
            return Some(chain);
        }
        if acyclic.contains(name) {
            return None;
        }
        // Unknown dependencies fail later, while wiring.
        let definition = self.definitions.get(name)?;
        path.push(name);
        for dependency in &definition.dependencies {
            if let Some(chain) = self.find_cycle(*dependency, path, acyclic) {
                return Some(chain);
            }
        }
        path.pop();
        acyclic.insert(name);
        None
    }
}
