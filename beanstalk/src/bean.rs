use std::any::{Any, type_name};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{BeanError, Container, Wirable, simple_type_name};

/// Type alias for boxed errors that can be sent across threads.
///
/// Used for failures raised by user code, such as a bean whose
/// default-construction path cannot complete.
pub type StdError = Box<dyn std::error::Error + Send + Sync>;

/// Type-erased handle to a container-managed bean.
///
/// Two handles refer to the same bean exactly when [`Arc::ptr_eq`] holds.
pub type BeanRef = Arc<dyn Any + Send + Sync>;

/// Lifetime policy of a bean.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// At most one instance per bean name for the container's lifetime.
    #[default]
    Singleton,
    /// A fresh instance on every retrieval, untracked by the container.
    Prototype,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Singleton => "singleton",
            Scope::Prototype => "prototype",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a scope marker is neither `singleton` nor `prototype`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseScopeError(pub String);

impl fmt::Display for ParseScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scope {:?}", self.0)
    }
}

impl std::error::Error for ParseScopeError {}

impl FromStr for Scope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "singleton" => Ok(Scope::Singleton),
            "prototype" => Ok(Scope::Prototype),
            other => Err(ParseScopeError(other.to_owned())),
        }
    }
}

/// Auxiliary markers an injectable type may carry.
///
/// All markers are optional: without an explicit name the bean name is derived
/// from the type's simple identifier, without an explicit scope the bean is a
/// singleton, and beans are eager unless marked lazy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BeanMarkers {
    /// Explicit bean name. An empty string counts as absent.
    pub name: Option<&'static str>,
    /// Explicit scope, one of `"singleton"` or `"prototype"`.
    pub scope: Option<&'static str>,
    /// Defer construction of a singleton until its first retrieval.
    pub lazy: bool,
}

impl BeanMarkers {
    pub const fn new() -> Self {
        Self {
            name: None,
            scope: None,
            lazy: false,
        }
    }

    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub const fn scope(mut self, scope: &'static str) -> Self {
        self.scope = Some(scope);
        self
    }

    pub const fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }
}

/// Trait for types the container may discover and manage.
///
/// Implementing `Bean` is the "injectable" marker: discovery only turns
/// candidates implementing it into bean definitions. Dependencies are declared
/// through the [`Wirable`] supertrait and are resolved by slot name after the
/// bean has been instantiated.
///
/// # Examples
///
/// ```rust
/// use beanstalk::{Autowired, Bean, BeanMarkers, BeanRef, Dependencies, StdError, Wirable, WireError};
/// use beanstalk::Autowire as _;
///
/// #[derive(Default)]
/// struct Repository;
///
/// impl Wirable for Repository {
///     fn wire(&mut self, slot: &str, _bean: BeanRef) -> Result<(), WireError> {
///         Err(WireError::UnknownSlot(slot.to_owned()))
///     }
/// }
///
/// impl Bean for Repository {
///     fn instantiate() -> Result<Self, StdError> {
///         Ok(Self)
///     }
/// }
///
/// #[derive(Default)]
/// struct Service {
///     repository: Autowired<Repository>,
/// }
///
/// impl Wirable for Service {
///     fn dependencies() -> Dependencies {
///         Dependencies::new().slot("repository")
///     }
///
///     fn wire(&mut self, slot: &str, bean: BeanRef) -> Result<(), WireError> {
///         match slot {
///             "repository" => self.repository.autowire(slot, bean),
///             _ => Err(WireError::UnknownSlot(slot.to_owned())),
///         }
///     }
/// }
///
/// impl Bean for Service {
///     fn markers() -> BeanMarkers {
///         BeanMarkers::new().lazy()
///     }
///
///     fn instantiate() -> Result<Self, StdError> {
///         Ok(Self::default())
///     }
/// }
/// ```
pub trait Bean: Wirable + Send + Sync + Sized + 'static {
    /// The unqualified type identifier the default bean name is derived from.
    fn simple_name() -> &'static str {
        simple_type_name(type_name::<Self>())
    }

    /// Auxiliary markers of this type.
    fn markers() -> BeanMarkers {
        BeanMarkers::new()
    }

    /// The default-construction path. Dependency slots are left empty and
    /// filled in by the container afterwards.
    fn instantiate() -> Result<Self, StdError>;
}

/// Monomorphised creation function stored in bean definitions.
pub(crate) type BeanFactory = fn(&Container, &str) -> Result<BeanRef, BeanError>;

/// Instantiates `T` and wires every declared dependency slot by name.
pub(crate) fn create_bean<T>(container: &Container, name: &str) -> Result<BeanRef, BeanError>
where
    T: Bean,
{
    let mut bean = T::instantiate().map_err(|source| BeanError::Instantiation {
        name: name.to_owned(),
        type_name: type_name::<T>(),
        source,
    })?;
    for slot in T::dependencies().iter() {
        let dependency = container.resolve(slot)?;
        bean.wire(slot, dependency)
            .map_err(|err| BeanError::from_wire(name, err))?;
    }
    Ok(Arc::new(bean))
}
