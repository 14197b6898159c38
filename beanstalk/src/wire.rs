//! Dependency slots and the wiring capability.
//!
//! The container never inspects a bean's fields. Instead every bean declares
//! its dependency slots by name through [`Wirable::dependencies`], and accepts
//! resolved beans through [`Wirable::wire`]. Slots are resolved by name, not by
//! type: a slot called `repository` receives whatever bean is registered under
//! the name `repository`, and the slot checks that the bean has the expected
//! type.
//!
//! # Examples
//!
//! ```rust
//! use beanstalk::{Autowire as _, Autowired, BeanRef, WireError};
//! use std::sync::Arc;
//!
//! struct Repository;
//!
//! let shared: BeanRef = Arc::new(Repository);
//! let mut slot = Autowired::<Repository>::default();
//! assert!(!slot.is_wired());
//! slot.autowire("repository", shared.clone()).unwrap();
//! assert!(slot.is_wired());
//!
//! let mut wrong = Autowired::<String>::default();
//! assert!(matches!(
//!     wrong.autowire("repository", shared),
//!     Err(WireError::TypeMismatch { .. })
//! ));
//! ```

use std::any::type_name;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::BeanRef;

/// Capability of a type to have its dependencies assigned after construction.
pub trait Wirable {
    /// Returns the dependency slots of this type in declaration order.
    ///
    /// The default implementation declares no slots.
    fn dependencies() -> Dependencies
    where
        Self: Sized,
    {
        Dependencies::new()
    }

    /// Assigns a resolved bean to the slot called `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::TypeMismatch`] if the bean cannot be stored in the
    /// slot and [`WireError::UnknownSlot`] if no slot has that name.
    fn wire(&mut self, slot: &str, bean: BeanRef) -> Result<(), WireError>;
}

/// Errors raised by a [`Wirable`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The resolved bean is not assignable to the slot's declared type.
    TypeMismatch {
        slot: String,
        expected: &'static str,
    },
    /// The type declares no slot with this name.
    UnknownSlot(String),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::TypeMismatch { slot, expected } => {
                write!(f, "Slot {slot} expects a bean of type {expected}")
            }
            WireError::UnknownSlot(slot) => write!(f, "Unknown dependency slot {slot}"),
        }
    }
}

impl std::error::Error for WireError {}

/// Ordered set of dependency slot names declared by a bean.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dependencies {
    slots: Vec<&'static str>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Adds a slot. Declaring the same slot twice has no effect.
    pub fn slot(mut self, name: &'static str) -> Self {
        if !self.slots.contains(&name) {
            self.slots.push(name);
        }
        self
    }

    /// Appends the slots of `other` that are not declared yet.
    pub fn merge(mut self, other: Dependencies) -> Self {
        for name in other.slots {
            self = self.slot(name);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A value that can receive a resolved bean.
///
/// Implemented for [`Autowired<T>`] and `Option<Arc<T>>`; these are the field
/// types `#[autowired]` accepts.
pub trait Autowire {
    fn autowire(&mut self, slot: &str, bean: BeanRef) -> Result<(), WireError>;
}

fn downcast<T>(slot: &str, bean: BeanRef) -> Result<Arc<T>, WireError>
where
    T: Send + Sync + 'static,
{
    bean.downcast::<T>().map_err(|_| WireError::TypeMismatch {
        slot: slot.to_owned(),
        expected: type_name::<T>(),
    })
}

impl<T> Autowire for Option<Arc<T>>
where
    T: Send + Sync + 'static,
{
    fn autowire(&mut self, slot: &str, bean: BeanRef) -> Result<(), WireError> {
        *self = Some(downcast(slot, bean)?);
        Ok(())
    }
}

/// Dependency slot holding a shared reference to another bean.
///
/// The slot is empty after instantiation and filled in by the container before
/// the owning bean is handed out, so beans obtained from a container can
/// dereference their slots directly.
///
/// The slot is resolved by its field name, never by `T`. A field
/// `order_repository` only wires a bean registered as `order_repository`; the
/// default name of `OrderRepository` is `orderRepository`, so such a type
/// needs `#[bean(name = "order_repository")]`.
pub struct Autowired<T> {
    inner: Option<Arc<T>>,
}

impl<T> Autowired<T> {
    /// Returns the wired bean, or `None` if the slot has not been wired.
    pub fn get(&self) -> Option<&Arc<T>> {
        self.inner.as_ref()
    }

    pub fn is_wired(&self) -> bool {
        self.inner.is_some()
    }
}

impl<T> Autowire for Autowired<T>
where
    T: Send + Sync + 'static,
{
    fn autowire(&mut self, slot: &str, bean: BeanRef) -> Result<(), WireError> {
        self.inner.autowire(slot, bean)
    }
}

impl<T> Default for Autowired<T> {
    fn default() -> Self {
        Self { inner: None }
    }
}

impl<T> Clone for Autowired<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> From<Arc<T>> for Autowired<T> {
    fn from(value: Arc<T>) -> Self {
        Self { inner: Some(value) }
    }
}

impl<T> Deref for Autowired<T> {
    type Target = T;

    /// # Panics
    ///
    /// Panics if the slot has not been wired yet.
    fn deref(&self) -> &T {
        match &self.inner {
            Some(v) => v,
            None => panic!("Dependency {} accessed before wiring", type_name::<T>()),
        }
    }
}

impl<T> fmt::Debug for Autowired<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(v) => f.debug_tuple("Autowired").field(v).finish(),
            None => f.write_str("Autowired(<unwired>)"),
        }
    }
}
