//! Type discovery: the collaborator that turns a scan root into candidate types.
//!
//! The container only sees [`TypeDescriptor`]s. How they are found is up to the
//! [`TypeDiscovery`] implementation:
//!
//! - [`StaticDiscovery`] holds an explicit, ordered list of types.
//! - [`InventoryDiscovery`] (feature `inventory`) collects every type that
//!   `#[derive(Bean)]` registered at link time.
//!
//! Scan roots are module paths. A type lies under a root when its module is the
//! root itself or one of its submodules.

use std::any::type_name;
use std::fmt;

use crate::bean::{BeanFactory, create_bean};
use crate::naming::is_under;
use crate::{Bean, BeanMarkers, Dependencies, StdError, module_path_of};

/// Errors reported by a [`TypeDiscovery`] implementation.
#[derive(Debug)]
pub enum DiscoveryError {
    /// No known type lies under the scan root.
    UnresolvedRoot(String),
    /// The collaborator failed while walking its sources.
    Traversal(StdError),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::UnresolvedRoot(root) => write!(f, "Cannot resolve scan root {root}"),
            DiscoveryError::Traversal(e) => write!(f, "Traversal failed: {e}"),
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::Traversal(e) => Some(e.as_ref()),
            DiscoveryError::UnresolvedRoot(_) => None,
        }
    }
}

/// Produces the candidate types found under a scan root.
///
/// The result must be finite and its order stable across runs, since the
/// container initializes eager singletons in discovery order.
pub trait TypeDiscovery: Send + Sync {
    fn discover(&self, root: &str) -> Result<Vec<TypeDescriptor>, DiscoveryError>;
}

/// Capabilities of an injectable type.
#[derive(Clone)]
pub(crate) struct Injectable {
    pub(crate) markers: BeanMarkers,
    pub(crate) dependencies: fn() -> Dependencies,
    pub(crate) factory: BeanFactory,
}

/// Descriptor of a candidate type.
///
/// Only descriptors built with [`TypeDescriptor::of`] carry the injectable
/// marker; descriptors of plain types are skipped while scanning.
#[derive(Clone)]
pub struct TypeDescriptor {
    type_name: &'static str,
    simple_name: &'static str,
    injectable: Option<Injectable>,
}

impl TypeDescriptor {
    /// Describes an injectable type.
    pub fn of<T>() -> Self
    where
        T: Bean,
    {
        Self {
            type_name: type_name::<T>(),
            simple_name: T::simple_name(),
            injectable: Some(Injectable {
                markers: T::markers(),
                dependencies: T::dependencies,
                factory: create_bean::<T>,
            }),
        }
    }

    /// Describes a type without the injectable marker.
    pub fn plain<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        let type_name = type_name::<T>();
        Self {
            type_name,
            simple_name: crate::simple_type_name(type_name),
            injectable: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn simple_name(&self) -> &'static str {
        self.simple_name
    }

    pub fn module_path(&self) -> &'static str {
        module_path_of(self.type_name)
    }

    pub fn is_injectable(&self) -> bool {
        self.injectable.is_some()
    }

    /// Returns the auxiliary markers, or `None` for plain types.
    pub fn markers(&self) -> Option<&BeanMarkers> {
        self.injectable.as_ref().map(|v| &v.markers)
    }

    pub(crate) fn injectable(&self) -> Option<&Injectable> {
        self.injectable.as_ref()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("markers", &self.markers())
            .finish()
    }
}

/// Discovery over an explicit list of types, kept in insertion order.
///
/// # Examples
///
/// ```rust
/// use beanstalk::{StaticDiscovery, TypeDiscovery};
///
/// struct Helper;
///
/// let discovery = StaticDiscovery::new().add_plain::<Helper>();
/// let root = beanstalk::module_path_of(std::any::type_name::<Helper>());
/// let found = discovery.discover(root).unwrap();
/// assert_eq!(found.len(), 1);
/// assert!(!found[0].is_injectable());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticDiscovery {
    types: Vec<TypeDescriptor>,
}

impl StaticDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T>(self) -> Self
    where
        T: Bean,
    {
        self.add_descriptor(TypeDescriptor::of::<T>())
    }

    pub fn add_plain<T>(self) -> Self
    where
        T: ?Sized + 'static,
    {
        self.add_descriptor(TypeDescriptor::plain::<T>())
    }

    pub fn add_descriptor(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeDescriptor> for StaticDiscovery {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

impl TypeDiscovery for StaticDiscovery {
    fn discover(&self, root: &str) -> Result<Vec<TypeDescriptor>, DiscoveryError> {
        let found: Vec<_> = self
            .types
            .iter()
            .filter(|v| is_under(v.module_path(), root))
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(DiscoveryError::UnresolvedRoot(root.to_owned()));
        }
        Ok(found)
    }
}

/// Link-time registration of an injectable type.
///
/// Submitted by `#[derive(Bean)]`; collected by [`InventoryDiscovery`].
#[cfg(feature = "inventory")]
pub struct BeanRegistration {
    descriptor: fn() -> TypeDescriptor,
}

#[cfg(feature = "inventory")]
impl BeanRegistration {
    pub const fn new(descriptor: fn() -> TypeDescriptor) -> Self {
        Self { descriptor }
    }
}

#[cfg(feature = "inventory")]
inventory::collect!(BeanRegistration);

/// Discovery over every type registered with `#[derive(Bean)]` in the
/// final binary.
///
/// Registrations are sorted by full type name, so the discovery order does not
/// depend on link order.
///
/// Only `Bean` types are registered, so a scan root whose module holds no
/// `Bean` type at all, even if it holds other types, cannot be told apart
/// from a root that does not exist. Both fail with
/// [`DiscoveryError::UnresolvedRoot`] rather than producing an empty
/// container.
#[cfg(feature = "inventory")]
#[derive(Clone, Copy, Debug, Default)]
pub struct InventoryDiscovery;

#[cfg(feature = "inventory")]
impl TypeDiscovery for InventoryDiscovery {
    fn discover(&self, root: &str) -> Result<Vec<TypeDescriptor>, DiscoveryError> {
        let mut types = Vec::new();
        for registration in inventory::iter::<BeanRegistration> {
            types.push((registration.descriptor)());
        }
        types.sort_by(|a, b| a.type_name().cmp(b.type_name()));
        StaticDiscovery::from_iter(types).discover(root)
    }
}

/// Registers a bean type for [`InventoryDiscovery`]. Expands to nothing when
/// the `inventory` feature is disabled.
#[cfg(feature = "inventory")]
#[doc(hidden)]
#[macro_export]
macro_rules! submit_bean {
    ($ty:ty) => {
        $crate::inventory::submit! {
            $crate::BeanRegistration::new($crate::TypeDescriptor::of::<$ty>)
        }
    };
}

#[cfg(not(feature = "inventory"))]
#[doc(hidden)]
#[macro_export]
macro_rules! submit_bean {
    ($ty:ty) => {};
}
