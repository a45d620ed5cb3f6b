// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory flag set adapter.
//!
//! This module provides [`MemoryFlagSet`], a flag set whose flags are registered
//! and set programmatically. It is handy when flags come from somewhere other
//! than `clap`, and in tests.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::{Flag, FlagSet, FlagValue};
use std::fmt;
use std::time::Duration;

/// The value held by a [`MemoryFlag`].
enum MemoryValue {
    /// Typed getter and formatter.
    Typed(ConfigValue),
    /// Formatter only.
    Text(String),
    /// Caller-supplied capabilities.
    Custom(Box<dyn FlagValue>),
}

impl FlagValue for MemoryValue {
    fn get(&self) -> Option<ConfigValue> {
        match self {
            MemoryValue::Typed(value) => Some(value.clone()),
            MemoryValue::Text(_) => None,
            MemoryValue::Custom(value) => value.get(),
        }
    }

    fn format(&self) -> Option<String> {
        match self {
            MemoryValue::Typed(value) => Some(value.to_string()),
            MemoryValue::Text(text) => Some(text.clone()),
            MemoryValue::Custom(value) => value.format(),
        }
    }
}

impl fmt::Debug for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryValue::Typed(value) => f.debug_tuple("Typed").field(value).finish(),
            MemoryValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            MemoryValue::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A flag registered in a [`MemoryFlagSet`].
#[derive(Debug)]
pub struct MemoryFlag {
    name: String,
    value: MemoryValue,
    default: Option<String>,
    changed: bool,
}

impl Flag for MemoryFlag {
    fn name(&self) -> &str {
        &self.name
    }

    fn changed(&self) -> bool {
        self.changed
    }

    fn value(&self) -> &dyn FlagValue {
        &self.value
    }

    fn default_value(&self) -> Option<String> {
        self.default.clone()
    }
}

/// A flag set populated in code.
///
/// Flags are registered with a default value and remain unchanged until
/// [`set`](MemoryFlagSet::set) is called, which records the new value and marks
/// the flag as changed by the user. Registration order is preserved.
///
/// # Examples
///
/// ```rust
/// use flagcfg::adapters::MemoryFlagSet;
/// use flagcfg::ports::Flag;
///
/// let mut flags = MemoryFlagSet::new("server");
/// flags.string("host", "localhost").int("port", 8080);
/// flags.set("port", 9090).unwrap();
///
/// assert!(flags.lookup("port").unwrap().changed());
/// assert!(!flags.lookup("host").unwrap().changed());
/// ```
#[derive(Debug)]
pub struct MemoryFlagSet {
    name: String,
    flags: Vec<MemoryFlag>,
}

impl MemoryFlagSet {
    /// Creates an empty flag set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: Vec::new(),
        }
    }

    /// Returns the name of the flag set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a string flag.
    pub fn string(&mut self, name: &str, default: &str) -> &mut Self {
        self.define(name, MemoryValue::Typed(ConfigValue::from(default)))
    }

    /// Registers an integer flag.
    pub fn int(&mut self, name: &str, default: i64) -> &mut Self {
        self.define(name, MemoryValue::Typed(ConfigValue::from(default)))
    }

    /// Registers a floating point flag.
    pub fn float(&mut self, name: &str, default: f64) -> &mut Self {
        self.define(name, MemoryValue::Typed(ConfigValue::from(default)))
    }

    /// Registers a boolean flag.
    pub fn boolean(&mut self, name: &str, default: bool) -> &mut Self {
        self.define(name, MemoryValue::Typed(ConfigValue::from(default)))
    }

    /// Registers a duration flag.
    pub fn duration(&mut self, name: &str, default: Duration) -> &mut Self {
        self.define(name, MemoryValue::Typed(ConfigValue::from(default)))
    }

    /// Registers a string list flag.
    pub fn string_slice(&mut self, name: &str, default: &[&str]) -> &mut Self {
        self.define(name, MemoryValue::Typed(ConfigValue::from(default.to_vec())))
    }

    /// Registers an integer list flag.
    pub fn int_slice(&mut self, name: &str, default: &[i64]) -> &mut Self {
        self.define(name, MemoryValue::Typed(ConfigValue::from(default.to_vec())))
    }

    /// Registers a string-to-string map flag.
    pub fn string_map(&mut self, name: &str, default: &[(&str, &str)]) -> &mut Self {
        let map = default
            .iter()
            .map(|(k, v)| (k.to_string(), ConfigValue::from(*v)))
            .collect::<ConfigMap>();
        self.define(name, MemoryValue::Typed(ConfigValue::Map(map)))
    }

    /// Registers a string-to-integer map flag.
    pub fn int_map(&mut self, name: &str, default: &[(&str, i64)]) -> &mut Self {
        let map = default
            .iter()
            .map(|(k, v)| (k.to_string(), ConfigValue::from(*v)))
            .collect::<ConfigMap>();
        self.define(name, MemoryValue::Typed(ConfigValue::Map(map)))
    }

    /// Registers a flag whose value can only be formatted, not read as a typed value.
    pub fn text(&mut self, name: &str, default: &str) -> &mut Self {
        self.define(name, MemoryValue::Text(default.to_string()))
    }

    /// Registers a flag backed by a caller-supplied value.
    pub fn custom(&mut self, name: &str, value: Box<dyn FlagValue>) -> &mut Self {
        self.define(name, MemoryValue::Custom(value))
    }

    fn define(&mut self, name: &str, value: MemoryValue) -> &mut Self {
        let flag = MemoryFlag {
            name: name.to_string(),
            default: value.format(),
            value,
            changed: false,
        };

        match self.flags.iter_mut().find(|f| f.name == name) {
            Some(existing) => {
                tracing::warn!(
                    "Flag '{}' redefined in flag set '{}'; replacing previous definition",
                    name,
                    self.name
                );
                *existing = flag;
            }
            None => self.flags.push(flag),
        }
        self
    }

    /// Sets a flag's value and marks it as changed by the user.
    ///
    /// Typed flags only accept a value of the same kind they were registered with;
    /// text flags accept anything and store its display form.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownFlag`] if no flag with that name is registered
    /// - [`ConfigError::TypeMismatch`] if the value kind does not match a typed flag
    /// - [`ConfigError::UnsupportedOperation`] for flags registered with [`custom`](MemoryFlagSet::custom)
    pub fn set(&mut self, name: &str, value: impl Into<ConfigValue>) -> Result<()> {
        let value = value.into();
        let flag = self
            .flags
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| ConfigError::UnknownFlag {
                name: name.to_string(),
            })?;

        match &mut flag.value {
            MemoryValue::Typed(current) => {
                if current.kind() != value.kind() {
                    return Err(ConfigError::TypeMismatch {
                        key: name.to_string(),
                        expected: current.kind().to_string(),
                        found: value.kind().to_string(),
                    });
                }
                *current = value;
            }
            MemoryValue::Text(current) => *current = value.to_string(),
            MemoryValue::Custom(_) => {
                return Err(ConfigError::unsupported(&self.name, "setting a custom flag value"));
            }
        }

        flag.changed = true;
        Ok(())
    }

    /// Returns the flag registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&MemoryFlag> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Returns the number of registered flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns `true` if no flags are registered.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FlagSet for MemoryFlagSet {
    fn visit_all(&self, visitor: &mut dyn FnMut(&dyn Flag)) {
        for flag in &self.flags {
            visitor(flag);
        }
    }
}
