//! # beanstalk-base
//!
//! Ambient services for beanstalk containers: layered JSON configuration,
//! tracing subscriber installation, and bootstrapping a container from
//! configuration.
//!
//! ## Core Components
//!
//! - **Configuration**: named JSON sections merged from several sources
//! - **Container section**: scan root and duplicate-name handling
//! - **Tracing**: `tracing-subscriber` with a reloadable level filter
//!
//! ## Quick Start
//!
//! ```rust
//! use beanstalk_base::{Config, bootstrap};
//!
//! mod beans {
//!     use beanstalk::Bean;
//!
//!     #[derive(Bean)]
//!     pub struct Greeter;
//! }
//!
//! let config = Config::new()
//!     .with("container", serde_json::json!({ "scan": module_path!() }))
//!     .unwrap();
//! let app = bootstrap(&config).unwrap();
//! assert!(app.container.is_instantiated("greeter"));
//! assert!(app.tracing.is_none());
//! ```

mod config;
mod container;
mod logging;

pub use config::*;
pub use container::*;
pub use logging::*;
