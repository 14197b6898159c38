use std::collections::BTreeMap;
use std::path::Path;

use beanstalk::StdError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// JSON document of named configuration sections.
///
/// Layers are combined with [`Config::merge_from`]: objects merge key by key,
/// arrays concatenate and every other value is replaced.
///
/// # Examples
///
/// ```rust
/// use beanstalk_base::Config;
///
/// let mut config = Config::parse(r#"{"container": {"scan": "app::beans"}}"#).unwrap();
/// config
///     .merge_from(Config::parse(r#"{"container": {"duplicate_names": "last_wins"}}"#).unwrap())
///     .unwrap();
/// let scan: Option<String> = config.get::<serde_json::Value>("container").unwrap()["scan"]
///     .as_str()
///     .map(str::to_owned);
/// assert_eq!(scan.as_deref(), Some("app::beans"));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    sections: BTreeMap<String, serde_json::Value>,
}

/// A typed configuration section stored under a fixed key.
pub trait ConfigSection: DeserializeOwned {
    fn key() -> &'static str;
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserializes the section `name`. A missing section reads as `null`, so
    /// `Option<T>` yields `None` for it.
    pub fn get<T>(&self, name: impl AsRef<str>) -> Result<T, StdError>
    where
        T: DeserializeOwned,
    {
        let value = self
            .sections
            .get(name.as_ref())
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(value)?)
    }

    /// Deserializes a typed section, or `None` if it is absent.
    pub fn section<T>(&self) -> Result<Option<T>, StdError>
    where
        T: ConfigSection,
    {
        self.get::<Option<T>>(T::key())
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.sections.contains_key(name.as_ref())
    }

    pub fn set<T>(&mut self, name: impl Into<String>, value: T) -> Result<(), StdError>
    where
        T: Serialize,
    {
        self.sections.insert(name.into(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn with<T>(mut self, name: impl Into<String>, value: T) -> Result<Self, StdError>
    where
        T: Serialize,
    {
        self.set(name, value)?;
        Ok(self)
    }

    pub fn merge_from(&mut self, other: Self) -> Result<(), StdError> {
        for (key, value) in other.sections {
            let entry = self.sections.entry(key).or_insert(serde_json::Value::Null);
            merge_json_from(entry, value);
        }
        Ok(())
    }

    pub fn parse<T>(text: T) -> Result<Self, StdError>
    where
        T: AsRef<str>,
    {
        Ok(serde_json::from_str(text.as_ref())?)
    }

    pub async fn parse_file(path: impl AsRef<Path>) -> Result<Self, StdError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Self::parse(text)
    }

    /// Parses every file in order and merges each one over the previous.
    pub async fn parse_files<I, P>(paths: I) -> Result<Self, StdError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut config = Self::new();
        for path in paths {
            config.merge_from(Self::parse_file(path).await?)?;
        }
        Ok(config)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

fn merge_json_from(lhs: &mut serde_json::Value, rhs: serde_json::Value) {
    match (lhs, rhs) {
        (serde_json::Value::Object(l), serde_json::Value::Object(r)) => {
            for (key, value) in r {
                merge_json_from(l.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (serde_json::Value::Array(l), serde_json::Value::Array(r)) => l.extend(r),
        (lhs, rhs) => *lhs = rhs,
    }
}
