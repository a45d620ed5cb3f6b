// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration provider trait definition.
//!
//! This module defines the `ConfigProvider` trait, the contract a layered
//! configuration aggregator expects from anything that supplies configuration:
//! read a nested map, read raw bytes, or watch for changes.

use crate::domain::{ConfigKey, ConfigMap, Result};
use std::sync::Arc;

/// Type alias for change notification callbacks.
///
/// This callback is invoked when a configuration value changes. It receives the
/// key that changed as a parameter.
pub type ChangeCallback = Arc<dyn Fn(ConfigKey) + Send + Sync>;

/// A source of configuration consumed by a layered aggregator.
///
/// Providers that have no raw serialized form, or that cannot change after
/// construction, return [`ConfigError::UnsupportedOperation`](crate::domain::ConfigError::UnsupportedOperation)
/// from the corresponding methods.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Examples
///
/// ```rust
/// use flagcfg::domain::{ConfigError, ConfigMap, Result};
/// use flagcfg::ports::{ChangeCallback, ConfigProvider};
///
/// struct Empty;
///
/// impl ConfigProvider for Empty {
///     fn name(&self) -> &str {
///         "empty"
///     }
///
///     fn read(&self) -> Result<ConfigMap> {
///         Ok(ConfigMap::new())
///     }
///
///     fn read_bytes(&self) -> Result<Vec<u8>> {
///         Err(ConfigError::unsupported(self.name(), "read_bytes"))
///     }
///
///     fn watch(&self, _callback: ChangeCallback) -> Result<()> {
///         Err(ConfigError::unsupported(self.name(), "watch"))
///     }
/// }
///
/// assert!(Empty.read().unwrap().is_empty());
/// assert!(Empty.read_bytes().is_err());
/// ```
pub trait ConfigProvider: Send + Sync {
    /// Returns the name of this provider, used in logs and error messages.
    fn name(&self) -> &str;

    /// Reads the provider's configuration as a nested map.
    fn read(&self) -> Result<ConfigMap>;

    /// Reads the provider's raw serialized configuration.
    fn read_bytes(&self) -> Result<Vec<u8>>;

    /// Starts watching for configuration changes, invoking `callback` on each change.
    fn watch(&self, callback: ChangeCallback) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigError, ConfigValue};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Fixed;

    impl ConfigProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn read(&self) -> Result<ConfigMap> {
            let mut map = ConfigMap::new();
            map.insert("answer".to_string(), ConfigValue::from(42));
            Ok(map)
        }

        fn read_bytes(&self) -> Result<Vec<u8>> {
            Ok(b"answer: 42".to_vec())
        }

        fn watch(&self, callback: ChangeCallback) -> Result<()> {
            callback(ConfigKey::from("answer"));
            Ok(())
        }
    }

    #[test]
    fn test_provider_read() {
        let map = Fixed.read().unwrap();
        assert_eq!(map["answer"], ConfigValue::from(42));
    }

    #[test]
    fn test_provider_watch_invokes_callback() {
        let invoked = Arc::new(AtomicBool::new(false));
        let flag = invoked.clone();
        Fixed
            .watch(Arc::new(move |_key: ConfigKey| flag.store(true, Ordering::SeqCst)))
            .unwrap();
        assert!(invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn test_unsupported_helper() {
        let err = ConfigError::unsupported("fixed", "watch");
        assert!(err.to_string().contains("watch"));
    }

    #[test]
    fn test_provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn ConfigProvider>>();
    }
}
