use std::fmt;

use crate::{DiscoveryError, StdError, WireError};

/// Errors that can occur while building a container or retrieving beans.
///
/// Errors raised while scanning or eagerly initializing singletons abort
/// container construction. Errors raised by a later retrieval of a lazy or
/// prototype bean are scoped to that call and leave the container intact.
#[derive(Debug)]
pub enum BeanError {
    /// Type discovery could not resolve the scan root or failed while
    /// traversing it.
    Discovery(DiscoveryError),
    /// Two discovered types resolve to the same bean name.
    ConfigurationConflict {
        name: String,
        existing: &'static str,
        conflicting: &'static str,
    },
    /// A type carries a scope marker that is neither `singleton` nor
    /// `prototype`.
    InvalidScope {
        type_name: &'static str,
        scope: String,
    },
    /// No bean is registered under this name.
    UnknownBean(String),
    /// The default-construction path of a bean failed.
    Instantiation {
        name: String,
        type_name: &'static str,
        source: StdError,
    },
    /// A resolved bean is not of the type its consumer expects. `field` is the
    /// dependency slot of bean `name`, or `None` for a typed retrieval.
    TypeMismatch {
        name: String,
        field: Option<String>,
        expected: &'static str,
    },
    /// A bean declared a dependency slot its `Wirable` implementation does not
    /// accept.
    UnknownSlot { name: String, slot: String },
    /// Creating the bean would recurse without bound. The chain starts and
    /// ends with the same bean name.
    CyclicDependency(Vec<String>),
}

impl BeanError {
    pub(crate) fn from_wire(name: &str, err: WireError) -> Self {
        match err {
            WireError::TypeMismatch { slot, expected } => BeanError::TypeMismatch {
                name: name.to_owned(),
                field: Some(slot),
                expected,
            },
            WireError::UnknownSlot(slot) => BeanError::UnknownSlot {
                name: name.to_owned(),
                slot,
            },
        }
    }
}

impl fmt::Display for BeanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeanError::Discovery(e) => write!(f, "Discovery error: {e}"),
            BeanError::ConfigurationConflict {
                name,
                existing,
                conflicting,
            } => write!(
                f,
                "Bean name {name} is claimed by both {existing} and {conflicting}"
            ),
            BeanError::InvalidScope { type_name, scope } => {
                write!(f, "Type {type_name} declares unknown scope {scope:?}")
            }
            BeanError::UnknownBean(name) => write!(f, "No bean named {name}"),
            BeanError::Instantiation {
                name, type_name, ..
            } => write!(f, "Cannot instantiate bean {name} of type {type_name}"),
            BeanError::TypeMismatch {
                name,
                field: Some(field),
                expected,
            } => write!(
                f,
                "Field {field} of bean {name} expects a bean of type {expected}"
            ),
            BeanError::TypeMismatch {
                name,
                field: None,
                expected,
            } => write!(f, "Bean {name} is not of type {expected}"),
            BeanError::UnknownSlot { name, slot } => {
                write!(f, "Bean {name} does not accept dependency slot {slot}")
            }
            BeanError::CyclicDependency(chain) => {
                write!(f, "Circular dependency detected: {}", chain.join(" -> "))
            }
        }
    }
}

impl std::error::Error for BeanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BeanError::Discovery(e) => Some(e),
            BeanError::Instantiation { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for BeanError {
    fn from(value: DiscoveryError) -> Self {
        Self::Discovery(value)
    }
}
