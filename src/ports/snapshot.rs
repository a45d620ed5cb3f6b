// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration snapshot trait definition.
//!
//! A snapshot is previously assembled configuration that a provider may consult
//! to learn whether a key path has already been supplied by another source.

use crate::domain::ConfigKey;

/// Read-only key-path existence queries against previously loaded configuration.
///
/// # Examples
///
/// ```rust
/// use flagcfg::domain::ConfigKey;
/// use flagcfg::ports::ConfigSnapshot;
///
/// struct Nothing;
///
/// impl ConfigSnapshot for Nothing {
///     fn exists(&self, _key: &ConfigKey) -> bool {
///         false
///     }
/// }
///
/// assert!(!Nothing.exists_str("server.port"));
/// ```
pub trait ConfigSnapshot: Send + Sync {
    /// Returns `true` if the exact key path exists, as a value or as a branch.
    fn exists(&self, key: &ConfigKey) -> bool;

    /// Convenience wrapper around [`exists`](ConfigSnapshot::exists) for string keys.
    fn exists_str(&self, key: &str) -> bool {
        self.exists(&ConfigKey::from(key))
    }
}
