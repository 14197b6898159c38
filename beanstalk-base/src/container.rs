use beanstalk::{ConfigurationRoot, Container, ContainerBuilder, DuplicatePolicy, StdError};
use serde::{Deserialize, Serialize};

use crate::{Config, ConfigSection, Tracing, TracingConfig};

/// How colliding bean names are handled, as spelled in configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNames {
    #[default]
    Reject,
    LastWins,
}

impl From<DuplicateNames> for DuplicatePolicy {
    fn from(value: DuplicateNames) -> Self {
        match value {
            DuplicateNames::Reject => DuplicatePolicy::Reject,
            DuplicateNames::LastWins => DuplicatePolicy::LastWins,
        }
    }
}

/// The `container` configuration section.
///
/// ```json
/// {
///     "container": {
///         "scan": "my_app::beans",
///         "duplicate_names": "last_wins"
///     }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Module path to scan. Without it the container starts empty.
    #[serde(default)]
    pub scan: Option<String>,
    #[serde(default)]
    pub duplicate_names: DuplicateNames,
}

impl ConfigSection for ContainerConfig {
    fn key() -> &'static str {
        "container"
    }
}

impl ConfigurationRoot for ContainerConfig {
    fn component_scan(&self) -> Option<&str> {
        self.scan.as_deref()
    }
}

pub trait ConfigureExt {
    fn configure(&mut self, config: &ContainerConfig) -> &mut Self;
}

impl ConfigureExt for ContainerBuilder {
    fn configure(&mut self, config: &ContainerConfig) -> &mut Self {
        self.duplicate_policy(config.duplicate_names.into())
    }
}

/// A container together with the tracing installed for it.
#[derive(Debug)]
pub struct Bootstrap {
    pub container: Container,
    pub tracing: Option<Tracing>,
}

/// Builds a container from `config` using the default discovery.
///
/// See [`bootstrap_with`].
pub fn bootstrap(config: &Config) -> Result<Bootstrap, StdError> {
    bootstrap_with(config, &mut Container::builder())
}

/// Builds a container from the `container` section of `config`.
///
/// When a `tracing` section is present the subscriber is installed first, so
/// that scanning and eager initialization are already logged.
///
/// # Errors
///
/// Fails if either section is malformed, if a subscriber is already
/// installed, or if the container cannot be built.
pub fn bootstrap_with(
    config: &Config,
    builder: &mut ContainerBuilder,
) -> Result<Bootstrap, StdError> {
    let tracing = match config.section::<TracingConfig>()? {
        Some(v) => Some(Tracing::install(&v)?),
        None => None,
    };
    let container_config = config.section::<ContainerConfig>()?.unwrap_or_default();
    let container = builder.configure(&container_config).build(&container_config)?;
    Ok(Bootstrap { container, tracing })
}
