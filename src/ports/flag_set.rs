// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flag set trait definitions.
//!
//! This module defines the interface a parsed flag set must offer to be read by a
//! [`FlagProvider`](crate::adapters::FlagProvider): ordered visiting of flags, and
//! per flag its name, change marker and value capabilities.

use crate::domain::ConfigValue;

/// The value held by a flag.
///
/// A value advertises up to two capabilities. [`get`](FlagValue::get) is the
/// typed getter, which preserves the native type of the value.
/// [`format`](FlagValue::format) is the string formatter. A value may expose
/// either, both, or neither; both default to `None`.
///
/// # Examples
///
/// ```rust
/// use flagcfg::domain::ConfigValue;
/// use flagcfg::ports::FlagValue;
///
/// struct Port(u16);
///
/// impl FlagValue for Port {
///     fn get(&self) -> Option<ConfigValue> {
///         Some(ConfigValue::from(self.0))
///     }
///
///     fn format(&self) -> Option<String> {
///         Some(self.0.to_string())
///     }
/// }
///
/// let port = Port(8080);
/// assert_eq!(port.get(), Some(ConfigValue::from(8080)));
/// ```
pub trait FlagValue: Send + Sync {
    /// Returns the value with its native type, if the value supports typed access.
    fn get(&self) -> Option<ConfigValue> {
        None
    }

    /// Returns the textual form of the value, if the value can be formatted.
    fn format(&self) -> Option<String> {
        None
    }
}

/// A single named flag.
pub trait Flag {
    /// Returns the flag name, which doubles as its delimited key path.
    fn name(&self) -> &str;

    /// Returns `true` if the user explicitly supplied this flag.
    fn changed(&self) -> bool;

    /// Returns the current value of the flag.
    fn value(&self) -> &dyn FlagValue;

    /// Returns the textual form of the flag's default value, if known.
    fn default_value(&self) -> Option<String> {
        None
    }
}

/// An ordered collection of parsed flags.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so providers built on them can be shared
/// across threads. Visiting must not mutate the set.
///
/// # Examples
///
/// ```rust
/// use flagcfg::adapters::MemoryFlagSet;
/// use flagcfg::ports::{Flag, FlagSet};
///
/// let mut flags = MemoryFlagSet::new("app");
/// flags.string("log.level", "info").int("workers", 4);
///
/// let mut names = Vec::new();
/// flags.visit_all(&mut |flag: &dyn Flag| names.push(flag.name().to_string()));
/// assert_eq!(names, vec!["log.level", "workers"]);
/// ```
pub trait FlagSet: Send + Sync {
    /// Calls `visitor` once for every registered flag, in registration order.
    fn visit_all(&self, visitor: &mut dyn FnMut(&dyn Flag));
}

impl<T: FlagSet + ?Sized> FlagSet for &T {
    fn visit_all(&self, visitor: &mut dyn FnMut(&dyn Flag)) {
        (**self).visit_all(visitor)
    }
}
