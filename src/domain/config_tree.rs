// SPDX-License-Identifier: MIT OR Apache-2.0

//! A nested configuration store addressed by delimited key paths.
//!
//! `ConfigTree` holds the result of previously loaded configuration (for example a
//! configuration file) and answers key-path existence queries, which makes it the
//! snapshot a [`FlagProvider`](crate::adapters::FlagProvider) consults when
//! deciding whether a flag default should be merged.

use crate::domain::key_path::flatten;
use crate::domain::{ConfigError, ConfigKey, ConfigMap, ConfigValue, Result};
use crate::ports::ConfigSnapshot;

/// A nested configuration map paired with the delimiter used to address it.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::{ConfigTree, ConfigValue};
/// use flagcfg::domain::key_path::unflatten;
///
/// let mut tree = ConfigTree::new(".");
/// tree.merge(unflatten(vec![("server.port".to_string(), ConfigValue::from(8080))], "."));
///
/// assert!(tree.exists("server"));
/// assert!(tree.exists("server.port"));
/// assert_eq!(tree.get("server.port"), Some(&ConfigValue::from(8080)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigTree {
    delimiter: String,
    root: ConfigMap,
}

impl ConfigTree {
    /// Creates an empty tree using `delimiter` to split key paths.
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            root: ConfigMap::new(),
        }
    }

    /// Creates a tree from an existing nested map.
    pub fn from_map(map: ConfigMap, delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            root: map,
        }
    }

    /// Parses a YAML document into a tree.
    ///
    /// Mappings become nested maps, sequences become lists, and scalars keep their
    /// YAML type. Non-string mapping keys are converted to their YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the content is not valid YAML or the
    /// document root is not a mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagcfg::domain::{ConfigTree, ConfigValue};
    ///
    /// let tree = ConfigTree::from_yaml_str("time: 2019-01-01\nkey:\n  int: 5\n", ".").unwrap();
    /// assert_eq!(tree.get("key.int"), Some(&ConfigValue::from(5)));
    /// ```
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(content: &str, delimiter: impl Into<String>) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new(delimiter));
        }

        let document: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Invalid YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        let root = match document {
            serde_yaml::Value::Null => ConfigMap::new(),
            serde_yaml::Value::Mapping(mapping) => yaml::to_config_map(mapping)?,
            other => {
                return Err(ConfigError::ParseError {
                    message: format!("YAML root must be a mapping, found {:?}", other),
                    source: None,
                })
            }
        };

        Ok(Self::from_map(root, delimiter))
    }

    /// Returns the delimiter used to split key paths.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Returns `true` if the key path resolves to a value or a branch.
    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the value at the key path, if any.
    ///
    /// Intermediate maps are returned as [`ConfigValue::Map`].
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        let key = ConfigKey::from(key);
        let segments = key.segments(&self.delimiter);
        let (leaf, parents) = segments.split_last()?;

        let mut node = &self.root;
        for segment in parents {
            match node.get(*segment)? {
                ConfigValue::Map(child) => node = child,
                _ => return None,
            }
        }
        node.get(*leaf)
    }

    /// Returns the value at the key path or a [`ConfigError::ConfigKeyNotFound`] error.
    pub fn value(&self, key: &str) -> Result<&ConfigValue> {
        self.get(key).ok_or_else(|| ConfigError::ConfigKeyNotFound {
            key: key.to_string(),
        })
    }

    /// Returns every leaf key path in key order.
    pub fn keys(&self) -> Vec<String> {
        flatten(&self.root, &self.delimiter)
            .into_iter()
            .map(|(key, _)| key)
            .collect()
    }

    /// Merges a nested map into the tree.
    ///
    /// Maps present on both sides are merged recursively; any other incoming value
    /// replaces what was there.
    pub fn merge(&mut self, incoming: ConfigMap) {
        merge_maps(&mut self.root, incoming);
    }

    /// Returns the underlying nested map.
    pub fn as_map(&self) -> &ConfigMap {
        &self.root
    }

    /// Consumes the tree and returns the underlying nested map.
    pub fn into_map(self) -> ConfigMap {
        self.root
    }

    /// Deserializes the tree into any type that implements `DeserializeOwned`.
    ///
    /// Durations are presented in their display form (e.g. `"1.5s"`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the tree does not match the target type.
    #[cfg(feature = "yaml")]
    pub fn unmarshal<T>(&self) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let value = serde_yaml::to_value(&self.root).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to encode configuration: {}", e),
            source: Some(Box::new(e)),
        })?;
        serde_yaml::from_value(value).map_err(|e| ConfigError::ParseError {
            message: format!(
                "Failed to decode configuration into {}: {}",
                std::any::type_name::<T>(),
                e
            ),
            source: Some(Box::new(e)),
        })
    }
}

fn merge_maps(target: &mut ConfigMap, incoming: ConfigMap) {
    for (key, value) in incoming {
        match value {
            ConfigValue::Map(child) => match target.get_mut(&key) {
                Some(ConfigValue::Map(existing)) => merge_maps(existing, child),
                _ => {
                    target.insert(key, ConfigValue::Map(child));
                }
            },
            value => {
                target.insert(key, value);
            }
        }
    }
}

impl ConfigSnapshot for ConfigTree {
    fn exists(&self, key: &ConfigKey) -> bool {
        ConfigTree::exists(self, key.as_str())
    }
}

#[cfg(feature = "yaml")]
mod yaml {
    use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
    use serde_yaml::{Mapping, Value};

    pub(super) fn to_config_value(value: Value) -> Result<ConfigValue> {
        Ok(match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ConfigValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    ConfigValue::from(u)
                } else {
                    ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => ConfigValue::String(s),
            Value::Sequence(items) => ConfigValue::List(
                items
                    .into_iter()
                    .map(to_config_value)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Mapping(mapping) => ConfigValue::Map(to_config_map(mapping)?),
            Value::Tagged(tagged) => to_config_value(tagged.value)?,
        })
    }

    pub(super) fn to_config_map(mapping: Mapping) -> Result<ConfigMap> {
        let mut map = ConfigMap::new();
        for (key, value) in mapping {
            map.insert(key_text(key)?, to_config_value(value)?);
        }
        Ok(map)
    }

    fn key_text(key: Value) -> Result<String> {
        match key {
            Value::String(s) => Ok(s),
            other => serde_yaml::to_string(&other)
                .map(|s| s.trim_end().to_string())
                .map_err(|e| ConfigError::ParseError {
                    message: format!("Unsupported YAML mapping key: {}", e),
                    source: Some(Box::new(e)),
                }),
        }
    }
}
