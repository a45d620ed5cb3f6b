// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype for type-safe key handling.
//!
//! This module provides the `ConfigKey` type, which is a newtype wrapper around `String`
//! that provides type safety for configuration keys and knows how to split itself into
//! nested path segments on a delimiter.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A type-safe wrapper for configuration keys.
///
/// `ConfigKey` wraps a `String` holding a delimited key path such as
/// `database.host`. The delimiter is not stored in the key; it is supplied by
/// whoever interprets the key (a provider or a configuration tree).
///
/// # Examples
///
/// ```
/// use flagcfg::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("database.host");
/// assert_eq!(key.as_str(), "database.host");
/// assert_eq!(key.segments("."), vec!["database", "host"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagcfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::new("app.name".to_string());
    /// assert_eq!(key.as_str(), "app.name");
    /// ```
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Joins path segments into a key using `delimiter`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagcfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from_segments(["server", "tls", "cert"], "/");
    /// assert_eq!(key.as_str(), "server/tls/cert");
    /// ```
    pub fn from_segments<I, S>(segments: I, delimiter: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = String::new();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                key.push_str(delimiter);
            }
            key.push_str(segment.as_ref());
        }
        ConfigKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the key is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits the key into path segments on `delimiter`.
    ///
    /// An empty delimiter does not split; the whole key is a single segment.
    /// Empty segments (`a..b`) are preserved so that splitting and joining are
    /// exact inverses.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagcfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from("a.b.c");
    /// assert_eq!(key.segments("."), vec!["a", "b", "c"]);
    /// assert_eq!(key.segments(""), vec!["a.b.c"]);
    /// ```
    pub fn segments(&self, delimiter: &str) -> Vec<&str> {
        if delimiter.is_empty() {
            return vec![self.0.as_str()];
        }
        self.0.split(delimiter).collect()
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for ConfigKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
