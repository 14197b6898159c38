//! # beanstalk
//!
//! A minimal inversion-of-control container. Given a configuration root and a
//! set of injectable types, it discovers those types, records how to build
//! them, and instantiates them on demand, wiring declared dependencies by name.
//!
//! ## Core Concepts
//!
//! - **Bean**: a container-managed instance of an injectable type, addressed by name
//! - **Bean definition**: the metadata needed to construct a bean (type, scope, laziness)
//! - **Scope**: singletons are created at most once, prototypes on every retrieval
//! - **Lazy**: singleton construction deferred until first retrieval
//! - **Autowiring**: dependency slots are filled with the bean whose name equals the slot name.
//!   Default names are decapitalized type names (`OrderRepository` becomes
//!   `orderRepository`), so a snake_case field wiring a multi-word type needs
//!   an explicit `#[bean(name = "...")]` on that type
//! - **Type discovery**: the pluggable collaborator that finds candidate types under a scan root
//!
//! ## Basic Usage
//!
//! ```rust
//! use beanstalk::{Container, component_scan};
//! use std::sync::Arc;
//!
//! mod beans {
//!     use beanstalk::{Autowired, Bean};
//!
//!     // Slots resolve by field name, so the bean is named after the field.
//!     #[derive(Bean, Default)]
//!     #[bean(name = "order_repository")]
//!     pub struct OrderRepository {
//!         pub orders: Vec<u64>,
//!     }
//!
//!     #[derive(Bean)]
//!     #[bean(scope = "prototype")]
//!     pub struct OrderService {
//!         #[autowired]
//!         pub order_repository: Autowired<OrderRepository>,
//!     }
//! }
//!
//! #[component_scan]
//! struct AppConfig;
//!
//! let container = Container::new(&AppConfig).unwrap();
//!
//! // Singletons are shared, prototypes are fresh on every retrieval.
//! let first = container.get_bean::<beans::OrderService>("orderService").unwrap();
//! let second = container.get_bean::<beans::OrderService>("orderService").unwrap();
//! assert!(!Arc::ptr_eq(&first, &second));
//! assert!(Arc::ptr_eq(
//!     first.order_repository.get().unwrap(),
//!     second.order_repository.get().unwrap(),
//! ));
//! ```
//!
//! ## Explicit Discovery
//!
//! Without link-time registration, list the candidate types explicitly:
//!
//! ```rust
//! use beanstalk::{Bean, BeanRef, Container, ConfigurationRoot, StaticDiscovery, StdError, Wirable, WireError};
//!
//! struct Clock;
//!
//! impl Wirable for Clock {
//!     fn wire(&mut self, slot: &str, _bean: BeanRef) -> Result<(), WireError> {
//!         Err(WireError::UnknownSlot(slot.to_owned()))
//!     }
//! }
//!
//! impl Bean for Clock {
//!     fn instantiate() -> Result<Self, StdError> {
//!         Ok(Self)
//!     }
//! }
//!
//! struct Root;
//!
//! impl ConfigurationRoot for Root {
//!     fn component_scan(&self) -> Option<&str> {
//!         Some("")
//!     }
//! }
//!
//! let container = Container::builder()
//!     .with_discovery(StaticDiscovery::new().add::<Clock>())
//!     .build(&Root)
//!     .unwrap();
//! assert!(container.is_instantiated("clock"));
//! ```
//!
//! ## Features
//!
//! - `macros` (default): enables `#[derive(Bean)]` and `#[component_scan]`
//! - `inventory` (default): link-time registration of derived beans and [`InventoryDiscovery`]

mod bean;
mod container;
mod discovery;
mod error;
mod naming;
mod pool;
mod registry;
mod wire;

pub use bean::{Bean, BeanMarkers, BeanRef, ParseScopeError, Scope, StdError};
pub use container::*;
pub use discovery::*;
pub use error::*;
pub use naming::{decapitalize, module_path_of, simple_type_name};
pub use registry::{BeanDefinition, DuplicatePolicy};
pub use wire::*;

#[cfg(feature = "macros")]
pub use beanstalk_macros::*;

#[cfg(feature = "inventory")]
#[doc(hidden)]
pub use inventory;
