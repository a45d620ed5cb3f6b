// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type with type-safe conversions.
//!
//! This module provides the `ConfigValue` type, a typed configuration value that
//! preserves the native type of a flag (integer, float, boolean, list, map,
//! duration) and the `ConfigMap` alias used for nested configuration maps.

use crate::domain::errors::{ConfigError, Result};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A nested configuration map.
///
/// Keys are single path segments; nesting is expressed through
/// [`ConfigValue::Map`]. A `BTreeMap` keeps iteration and serialization order
/// deterministic.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A typed configuration value.
///
/// Values produced from flags keep their native type whenever the flag exposes
/// one. Values that only have a textual representation are stored as
/// [`ConfigValue::String`], and flags that expose neither become
/// [`ConfigValue::Null`].
///
/// # Examples
///
/// ```
/// use flagcfg::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::from(42);
/// assert_eq!(value.as_i64("test.key").unwrap(), 42);
/// assert_eq!(value.to_string(), "42");
///
/// let list = ConfigValue::from(vec![1, 2, 3]);
/// assert_eq!(list.to_string(), "[1,2,3]");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// No value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A signed integer value.
    Integer(i64),
    /// A floating point value.
    Float(f64),
    /// A string value.
    String(String),
    /// A duration, serialized in its display form (e.g. `1.5s`).
    Duration(#[serde(serialize_with = "serialize_duration")] Duration),
    /// A homogeneous sequence of values.
    List(Vec<ConfigValue>),
    /// A nested map of values.
    Map(ConfigMap),
}

fn serialize_duration<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&format_args!("{:?}", duration))
}

impl ConfigValue {
    /// Returns a short name for the kind of value held.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::Duration(_) => "duration",
            ConfigValue::List(_) => "list",
            ConfigValue::Map(_) => "map",
        }
    }

    /// Returns `true` if this is [`ConfigValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns the string slice if this is a [`ConfigValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the value to a boolean.
    ///
    /// Booleans are returned as-is, integers are `true` when non-zero, and strings
    /// recognize the following values (case-insensitive):
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    ///
    /// # Examples
    ///
    /// ```
    /// use flagcfg::domain::config_value::ConfigValue;
    ///
    /// assert!(ConfigValue::from(true).as_bool("test.key").unwrap());
    /// assert!(ConfigValue::from("yes").as_bool("test.key").unwrap());
    /// assert!(!ConfigValue::from(0).as_bool("test.key").unwrap());
    /// ```
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self {
            ConfigValue::Bool(b) => Ok(*b),
            ConfigValue::Integer(i) => Ok(*i != 0),
            ConfigValue::String(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(true),
                "false" | "no" | "0" | "off" => Ok(false),
                _ => s
                    .parse::<bool>()
                    .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
            },
            other => Err(other.mismatch(key, "boolean")),
        }
    }

    /// Converts the value to an `i64`.
    ///
    /// Strings are parsed; floats convert only when they have no fractional part.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        match self {
            ConfigValue::Integer(i) => Ok(*i),
            ConfigValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(*f as i64),
            ConfigValue::String(s) => s
                .parse::<i64>()
                .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e)),
            other => Err(other.mismatch(key, "integer")),
        }
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        match self {
            ConfigValue::Float(f) => Ok(*f),
            ConfigValue::Integer(i) => Ok(*i as f64),
            ConfigValue::String(s) => s
                .parse::<f64>()
                .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e)),
            other => Err(other.mismatch(key, "float")),
        }
    }

    /// Returns the duration if this is a [`ConfigValue::Duration`].
    pub fn as_duration(&self, key: &str) -> Result<Duration> {
        match self {
            ConfigValue::Duration(d) => Ok(*d),
            other => Err(other.mismatch(key, "duration")),
        }
    }

    /// Returns the elements if this is a [`ConfigValue::List`].
    pub fn as_list(&self, key: &str) -> Result<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Ok(items),
            other => Err(other.mismatch(key, "list")),
        }
    }

    /// Returns the nested map if this is a [`ConfigValue::Map`].
    pub fn as_map(&self, key: &str) -> Result<&ConfigMap> {
        match self {
            ConfigValue::Map(map) => Ok(map),
            other => Err(other.mismatch(key, "map")),
        }
    }

    /// Parses the display form of the value into any type that implements `FromStr`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagcfg::domain::config_value::ConfigValue;
    /// use std::net::IpAddr;
    ///
    /// let value = ConfigValue::from("127.0.0.1");
    /// let ip: IpAddr = value.parse("test.key").unwrap();
    /// assert_eq!(ip.to_string(), "127.0.0.1");
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.to_string()
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }

    fn mismatch(&self, key: &str, expected: &str) -> ConfigError {
        ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            found: self.kind().to_string(),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => Ok(()),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Duration(d) => write!(f, "{:?}", d),
            ConfigValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            ConfigValue::Map(map) => {
                f.write_str("[")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from_lossless_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConfigValue {
                fn from(v: $ty) -> Self {
                    ConfigValue::Integer(i64::from(v))
                }
            }
        )*
    };
}

impl_from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_int {
    ($($ty:ty),*) => {
        $(
            // Values beyond i64 keep their decimal form rather than wrapping.
            impl From<$ty> for ConfigValue {
                fn from(v: $ty) -> Self {
                    i64::try_from(v)
                        .map(ConfigValue::Integer)
                        .unwrap_or_else(|_| ConfigValue::String(v.to_string()))
                }
            }
        )*
    };
}

impl_from_wide_int!(u64, usize, isize);

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<f32> for ConfigValue {
    fn from(v: f32) -> Self {
        ConfigValue::Float(f64::from(v))
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<Duration> for ConfigValue {
    fn from(d: Duration) -> Self {
        ConfigValue::Duration(d)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Map(map)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ConfigValue::Null, Into::into)
    }
}
