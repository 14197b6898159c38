use std::any::type_name;
use std::sync::Arc;

use crate::pool::InstancePool;
use crate::registry::Registry;
use crate::{BeanDefinition, BeanError, BeanRef, DuplicatePolicy, Scope, TypeDiscovery};

/// The object a container is built from.
///
/// A configuration root optionally carries the scan root marker: the module
/// path discovery starts from. Without it the container is built with an empty
/// registry.
///
/// # Examples
///
/// ```rust
/// use beanstalk::{ConfigurationRoot, component_scan};
///
/// #[component_scan("my_app::beans")]
/// struct AppConfig;
///
/// assert_eq!(AppConfig.component_scan(), Some("my_app::beans"));
/// ```
pub trait ConfigurationRoot {
    fn component_scan(&self) -> Option<&str> {
        None
    }
}

/// Inversion-of-control container holding bean definitions and singletons.
///
/// A container is only ever handed out fully initialized: every eager
/// singleton has been constructed and wired. Afterwards it serves bean
/// retrievals by name and may be shared between threads.
///
/// # Examples
///
/// ```rust
/// use beanstalk::{Container, component_scan};
/// use std::sync::Arc;
///
/// mod beans {
///     use beanstalk::{Autowired, Bean};
///
///     #[derive(Bean)]
///     pub struct Repository;
///
///     #[derive(Bean)]
///     pub struct Service {
///         #[autowired]
///         pub repository: Autowired<Repository>,
///     }
/// }
///
/// #[component_scan]
/// struct AppConfig;
///
/// let container = Container::new(&AppConfig).unwrap();
/// let service = container.get_bean::<beans::Service>("service").unwrap();
/// let repository = container.get_bean::<beans::Repository>("repository").unwrap();
/// assert!(Arc::ptr_eq(service.repository.get().unwrap(), &repository));
/// ```
pub struct Container {
    registry: Registry,
    pool: InstancePool,
}

impl Container {
    /// Creates a builder for configuring discovery and duplicate handling.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder {
            discovery: default_discovery(),
            duplicates: DuplicatePolicy::default(),
        }
    }

    /// Builds a container from `root` using the default discovery.
    ///
    /// With the `inventory` feature the default discovery finds every type
    /// deriving `Bean`. Without it the default discovery knows no types, so a
    /// root carrying a scan marker fails with
    /// [`DiscoveryError::UnresolvedRoot`](crate::DiscoveryError::UnresolvedRoot);
    /// use [`Container::builder`] with a [`StaticDiscovery`](crate::StaticDiscovery)
    /// instead.
    pub fn new<R>(root: &R) -> Result<Self, BeanError>
    where
        R: ConfigurationRoot + ?Sized,
    {
        Self::builder().build(root)
    }

    /// Retrieves the bean registered under `name`.
    ///
    /// Singletons are created on first retrieval if they are not pooled yet;
    /// prototypes are created on every call.
    ///
    /// # Errors
    ///
    /// Fails with [`BeanError::UnknownBean`] if no bean has that name, with
    /// [`BeanError::CyclicDependency`] if its dependency graph is cyclic, and
    /// with any error raised while creating it or its dependencies.
    pub fn get_bean_ref(&self, name: &str) -> Result<BeanRef, BeanError> {
        if let Some(bean) = self.pool.get(name) {
            return Ok(bean);
        }
        self.registry.lookup(name)?;
        if let Some(chain) = self.registry.cycle(name) {
            return Err(BeanError::CyclicDependency(chain.clone()));
        }
        self.resolve(name)
    }

    /// Retrieves the bean registered under `name` as a `T`.
    ///
    /// # Errors
    ///
    /// Fails like [`Container::get_bean_ref`], and with
    /// [`BeanError::TypeMismatch`] if the bean is not a `T`.
    pub fn get_bean<T>(&self, name: &str) -> Result<Arc<T>, BeanError>
    where
        T: Send + Sync + 'static,
    {
        self.get_bean_ref(name)?
            .downcast::<T>()
            .map_err(|_| BeanError::TypeMismatch {
                name: name.to_owned(),
                field: None,
                expected: type_name::<T>(),
            })
    }

    pub fn contains_bean(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Returns the registered bean names in discovery order.
    pub fn bean_names(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    pub fn definition(&self, name: &str) -> Result<&BeanDefinition, BeanError> {
        self.registry.lookup(name)
    }

    /// Tests whether a singleton instance of `name` has been constructed.
    ///
    /// Always `false` for prototypes, which are never pooled.
    pub fn is_instantiated(&self, name: &str) -> bool {
        self.pool.contains(name)
    }

    /// Returns the number of registered beans.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Retrieval without the cycle check, used while wiring. The cycle check
    /// done by the outermost retrieval covers every bean reachable from it.
    pub(crate) fn resolve(&self, name: &str) -> Result<BeanRef, BeanError> {
        let definition = self.registry.lookup(name)?;
        match definition.scope() {
            Scope::Singleton => self
                .pool
                .get_or_try_insert_with(name, || self.create(name, definition)),
            Scope::Prototype => self.create(name, definition),
        }
    }

    fn create(&self, name: &str, definition: &BeanDefinition) -> Result<BeanRef, BeanError> {
        tracing::debug!(
            bean = name,
            type_name = definition.type_name(),
            scope = %definition.scope(),
            "Creating bean"
        );
        (definition.factory())(self, name)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("beans", &self.registry.names().collect::<Vec<_>>())
            .field("singletons", &self.pool.len())
            .finish()
    }
}

/// Builder for constructing a [`Container`].
///
/// # Examples
///
/// ```rust
/// use beanstalk::{Container, ConfigurationRoot, DuplicatePolicy, StaticDiscovery};
///
/// struct Empty;
///
/// impl ConfigurationRoot for Empty {}
///
/// let container = Container::builder()
///     .with_discovery(StaticDiscovery::new())
///     .duplicate_policy(DuplicatePolicy::LastWins)
///     .build(&Empty)
///     .unwrap();
/// assert!(container.is_empty());
/// ```
pub struct ContainerBuilder {
    discovery: Box<dyn TypeDiscovery>,
    duplicates: DuplicatePolicy,
}

impl ContainerBuilder {
    /// Replaces the type discovery collaborator.
    pub fn with_discovery<D>(&mut self, discovery: D) -> &mut Self
    where
        D: TypeDiscovery + 'static,
    {
        self.discovery = Box::new(discovery);
        self
    }

    /// Sets how bean-name collisions are handled. Defaults to
    /// [`DuplicatePolicy::Reject`].
    pub fn duplicate_policy(&mut self, policy: DuplicatePolicy) -> &mut Self {
        self.duplicates = policy;
        self
    }

    /// Scans, registers and eagerly initializes the beans under `root`.
    ///
    /// # Errors
    ///
    /// Any discovery, registration or eager creation error aborts the build.
    pub fn build<R>(&self, root: &R) -> Result<Container, BeanError>
    where
        R: ConfigurationRoot + ?Sized,
    {
        let mut registry = Registry::new(self.duplicates);
        match root.component_scan() {
            Some(scan) => {
                tracing::debug!(root = scan, "Scanning for beans");
                for candidate in self.discovery.discover(scan)? {
                    match BeanDefinition::from_descriptor(&candidate)? {
                        Some((name, definition)) => registry.register(name, definition)?,
                        None => tracing::trace!(
                            type_name = candidate.type_name(),
                            "Skipping non-injectable type"
                        ),
                    }
                }
            }
            None => tracing::debug!("Configuration root has no scan marker"),
        }
        registry.seal();
        let container = Container {
            registry,
            pool: InstancePool::new(),
        };
        tracing::debug!(beans = container.len(), "Initializing eager singletons");
        let eager: Vec<_> = container
            .registry
            .names()
            .filter(|name| matches!(container.registry.lookup(name), Ok(v) if v.is_eager()))
            .map(str::to_owned)
            .collect();
        for name in eager {
            container.get_bean_ref(&name)?;
        }
        tracing::debug!(
            beans = container.len(),
            singletons = container.pool.len(),
            "Container ready"
        );
        Ok(container)
    }
}

#[cfg(feature = "inventory")]
fn default_discovery() -> Box<dyn TypeDiscovery> {
    Box::new(crate::InventoryDiscovery)
}

#[cfg(not(feature = "inventory"))]
fn default_discovery() -> Box<dyn TypeDiscovery> {
    Box::new(crate::StaticDiscovery::new())
}
