// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flag set configuration provider.
//!
//! This module provides [`FlagProvider`], which reads an already parsed flag set and
//! produces a nested configuration map, splitting flag names on a delimiter into
//! key paths. Defaults of flags the user never touched can be suppressed when a
//! snapshot of previously loaded configuration already supplies the same key.

use crate::domain::key_path::unflatten;
use crate::domain::{ConfigError, ConfigKey, ConfigMap, ConfigValue, Result};
use crate::ports::{ChangeCallback, ConfigProvider, ConfigSnapshot, Flag, FlagSet};
use std::fmt;

const PROVIDER_NAME: &str = "flags";

/// Callback receiving a flag name and its formatted value.
pub type KeyValueCallback<'a> = Box<dyn Fn(&str, &str) -> (String, ConfigValue) + Send + Sync + 'a>;

/// Callback receiving the flag itself.
pub type FlagCallback<'a> = Box<dyn Fn(&dyn Flag) -> (String, ConfigValue) + Send + Sync + 'a>;

/// How each flag is turned into a `(key, value)` pair.
enum Extraction<'a> {
    /// Flag name as key, [`flag_value`] as value.
    Default,
    /// Caller rewrites the name and formatted value.
    KeyValue(KeyValueCallback<'a>),
    /// Caller inspects the whole flag.
    Flag(FlagCallback<'a>),
}

impl Extraction<'_> {
    fn label(&self) -> &'static str {
        match self {
            Extraction::Default => "default",
            Extraction::KeyValue(_) => "key-value callback",
            Extraction::Flag(_) => "flag callback",
        }
    }
}

/// Configuration provider that reads a parsed flag set.
///
/// Every flag is visited in registration order. Its name is split on the
/// delimiter to form a nested key path, so with the delimiter `.` the flag
/// `parent.child.key=1` becomes `{parent: {child: {key: 1}}}`.
///
/// # Merge policy
///
/// A flag the user explicitly changed is always included. A flag left at its
/// default is included unless a snapshot is configured and the snapshot already
/// contains the flag's key, in which case the earlier source wins.
///
/// # Callbacks
///
/// A key-value callback receives the flag name and formatted value; a flag
/// callback receives the flag itself. Either may rename the key or convert the
/// value, and returning an empty key drops the flag. When both are configured
/// the key-value callback is used.
///
/// # Examples
///
/// ```rust
/// use flagcfg::adapters::{FlagProvider, MemoryFlagSet};
/// use flagcfg::domain::ConfigValue;
/// use flagcfg::ports::ConfigProvider;
///
/// let mut flags = MemoryFlagSet::new("app");
/// flags.string("key.one-example", "val1").int("key.int", 123);
///
/// let map = FlagProvider::new(&flags, ".").read().unwrap();
/// let key = map["key"].as_map("key").unwrap();
/// assert_eq!(key["one-example"], ConfigValue::from("val1"));
/// assert_eq!(key["int"], ConfigValue::from(123));
/// ```
pub struct FlagProvider<'a, F: ?Sized> {
    flags: &'a F,
    delimiter: String,
    snapshot: Option<&'a dyn ConfigSnapshot>,
    extraction: Extraction<'a>,
}

impl<'a, F> FlagProvider<'a, F>
where
    F: FlagSet + ?Sized,
{
    /// Creates a provider over `flags`, nesting keys on `delimiter`.
    pub fn new(flags: &'a F, delimiter: impl Into<String>) -> Self {
        Self {
            flags,
            delimiter: delimiter.into(),
            snapshot: None,
            extraction: Extraction::Default,
        }
    }

    /// Sets the snapshot consulted for flags the user did not change.
    ///
    /// Defaults of such flags are only merged when the snapshot does not already
    /// contain their key.
    pub fn with_snapshot(mut self, snapshot: &'a dyn ConfigSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Sets a callback that maps `(name, formatted value)` to `(key, value)`.
    ///
    /// Useful when a flag's textual form needs custom parsing, such as lists with
    /// a custom separator. Returning an empty key drops the flag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flagcfg::adapters::{FlagProvider, MemoryFlagSet};
    /// use flagcfg::domain::ConfigValue;
    /// use flagcfg::ports::ConfigProvider;
    ///
    /// let mut flags = MemoryFlagSet::new("app");
    /// flags.text("hosts", "a;b");
    ///
    /// let provider = FlagProvider::new(&flags, ".").with_key_value_callback(|key, value| {
    ///     let hosts: Vec<ConfigValue> = value.split(';').map(ConfigValue::from).collect();
    ///     (key.to_string(), ConfigValue::List(hosts))
    /// });
    /// let map = provider.read().unwrap();
    /// assert_eq!(map["hosts"], ConfigValue::from(vec!["a", "b"]));
    /// ```
    pub fn with_key_value_callback<C>(mut self, callback: C) -> Self
    where
        C: Fn(&str, &str) -> (String, ConfigValue) + Send + Sync + 'a,
    {
        self.extraction = Extraction::KeyValue(Box::new(callback));
        self
    }

    /// Sets a callback that maps a whole flag to `(key, value)`.
    ///
    /// The callback gets full access to the flag; [`flag_value`] can be used inside
    /// it to reuse the default value extraction. Returning an empty key drops the
    /// flag. Ignored if a key-value callback is already configured.
    pub fn with_flag_callback<C>(mut self, callback: C) -> Self
    where
        C: Fn(&dyn Flag) -> (String, ConfigValue) + Send + Sync + 'a,
    {
        if let Extraction::KeyValue(_) = self.extraction {
            tracing::debug!("Ignoring flag callback; a key-value callback is already configured");
            return self;
        }
        self.extraction = Extraction::Flag(Box::new(callback));
        self
    }

    /// Returns the delimiter used to nest keys.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    fn extract(&self, flag: &dyn Flag) -> (String, ConfigValue) {
        match &self.extraction {
            Extraction::KeyValue(callback) => callback(flag.name(), &formatted(flag)),
            Extraction::Flag(callback) => callback(flag),
            Extraction::Default => (flag.name().to_string(), flag_value(flag)),
        }
    }

    fn should_merge(&self, flag: &dyn Flag, key: &ConfigKey) -> bool {
        if flag.changed() {
            return true;
        }
        match self.snapshot {
            Some(snapshot) => !snapshot.exists(key),
            None => true,
        }
    }
}

impl<F> ConfigProvider for FlagProvider<'_, F>
where
    F: FlagSet + ?Sized,
{
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn read(&self) -> Result<ConfigMap> {
        let mut entries = Vec::new();
        let mut visited = 0usize;

        self.flags.visit_all(&mut |flag: &dyn Flag| {
            visited += 1;
            let (key, value) = self.extract(flag);
            let key = ConfigKey::from(key);
            if key.is_empty() {
                tracing::trace!("Dropping flag '{}': resolved to an empty key", flag.name());
                return;
            }
            if !self.should_merge(flag, &key) {
                tracing::trace!(
                    "Skipping default of flag '{}': key '{}' already present in snapshot",
                    flag.name(),
                    key
                );
                return;
            }
            entries.push((key.into_string(), value));
        });

        tracing::debug!(
            "Read {} of {} flags (delimiter={:?}, extraction={}, snapshot={})",
            entries.len(),
            visited,
            self.delimiter,
            self.extraction.label(),
            self.snapshot.is_some()
        );

        Ok(unflatten(entries, &self.delimiter))
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        Err(ConfigError::unsupported(PROVIDER_NAME, "read_bytes"))
    }

    fn watch(&self, _callback: ChangeCallback) -> Result<()> {
        Err(ConfigError::unsupported(PROVIDER_NAME, "watch"))
    }
}

impl<F: ?Sized> fmt::Debug for FlagProvider<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagProvider")
            .field("delimiter", &self.delimiter)
            .field("snapshot", &self.snapshot.is_some())
            .field("extraction", &self.extraction.label())
            .finish()
    }
}

/// Returns the typed value of a flag.
///
/// The flag's typed getter is preferred so the native type survives (integers
/// stay integers, lists stay lists). Without one the formatted string is used,
/// and a flag exposing neither yields [`ConfigValue::Null`].
///
/// # Examples
///
/// ```rust
/// use flagcfg::adapters::{flag_value, FlagProvider, MemoryFlagSet};
/// use flagcfg::domain::ConfigValue;
/// use flagcfg::ports::{ConfigProvider, Flag};
///
/// let mut flags = MemoryFlagSet::new("app");
/// flags.int("log-level", 3);
///
/// let provider = FlagProvider::new(&flags, ".")
///     .with_flag_callback(|flag: &dyn Flag| (flag.name().replace('-', "_"), flag_value(flag)));
/// let map = provider.read().unwrap();
/// assert_eq!(map["log_level"], ConfigValue::from(3));
/// ```
pub fn flag_value(flag: &dyn Flag) -> ConfigValue {
    let value = flag.value();
    value
        .get()
        .or_else(|| value.format().map(ConfigValue::String))
        .unwrap_or(ConfigValue::Null)
}

/// The string handed to key-value callbacks.
fn formatted(flag: &dyn Flag) -> String {
    let value = flag.value();
    value
        .format()
        .or_else(|| value.get().map(|typed| typed.to_string()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryFlagSet;
    use crate::domain::ConfigTree;
    use crate::ports::FlagValue;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn example_flags() -> MemoryFlagSet {
        let mut flags = MemoryFlagSet::new("test");
        flags.string("key.one-example", "val1").int("key.int", 123);
        flags
    }

    fn snapshot_with(keys: &[&str]) -> ConfigTree {
        let entries = keys
            .iter()
            .map(|k| (k.to_string(), ConfigValue::from("from-file")))
            .collect::<Vec<_>>();
        ConfigTree::from_map(unflatten(entries, "."), ".")
    }

    #[test]
    fn test_defaults_without_snapshot() {
        let flags = example_flags();
        let map = FlagProvider::new(&flags, ".").read().unwrap();

        let mut key = ConfigMap::new();
        key.insert("one-example".to_string(), ConfigValue::from("val1"));
        key.insert("int".to_string(), ConfigValue::from(123));
        let mut expected = ConfigMap::new();
        expected.insert("key".to_string(), ConfigValue::Map(key));

        assert_eq!(map, expected);
    }

    #[test]
    fn test_snapshot_shadows_unchanged_default() {
        let flags = example_flags();
        let snapshot = snapshot_with(&["key.one-example"]);
        let map = FlagProvider::new(&flags, ".")
            .with_snapshot(&snapshot)
            .read()
            .unwrap();

        let key = map["key"].as_map("key").unwrap();
        assert_eq!(key.len(), 1);
        assert_eq!(key["int"], ConfigValue::from(123));
    }

    #[test]
    fn test_empty_snapshot_keeps_defaults() {
        let flags = example_flags();
        let snapshot = ConfigTree::new(".");
        let map = FlagProvider::new(&flags, ".")
            .with_snapshot(&snapshot)
            .read()
            .unwrap();
        assert_eq!(map["key"].as_map("key").unwrap().len(), 2);
    }

    #[test]
    fn test_changed_flag_ignores_snapshot() {
        let mut flags = example_flags();
        flags.set("key.one-example", "from-cli").unwrap();
        let snapshot = snapshot_with(&["key.one-example", "key.int"]);

        let map = FlagProvider::new(&flags, ".")
            .with_snapshot(&snapshot)
            .read()
            .unwrap();

        let key = map["key"].as_map("key").unwrap();
        assert_eq!(key.len(), 1);
        assert_eq!(key["one-example"], ConfigValue::from("from-cli"));
    }

    #[test]
    fn test_key_value_callback_receives_formatted_value() {
        let mut flags = MemoryFlagSet::new("test");
        flags.int_slice("key.ints", &[1, 2, 3]);

        let map = FlagProvider::new(&flags, ".")
            .with_key_value_callback(|key, value| (key.to_string(), ConfigValue::from(value)))
            .read()
            .unwrap();

        let key = map["key"].as_map("key").unwrap();
        assert_eq!(key["ints"], ConfigValue::from("[1,2,3]"));
    }

    #[test]
    fn test_key_value_callback_empty_key_drops_changed_flag() {
        let mut flags = example_flags();
        flags.set("key.int", 9).unwrap();

        let map = FlagProvider::new(&flags, ".")
            .with_key_value_callback(|key, value| {
                if key == "key.int" {
                    (String::new(), ConfigValue::from(value))
                } else {
                    (key.to_string(), ConfigValue::from(value))
                }
            })
            .read()
            .unwrap();

        let key = map["key"].as_map("key").unwrap();
        assert!(!key.contains_key("int"));
        assert_eq!(key["one-example"], ConfigValue::from("val1"));
    }

    #[test]
    fn test_flag_callback_empty_key_drops_flag() {
        let flags = example_flags();
        let map = FlagProvider::new(&flags, ".")
            .with_flag_callback(|flag: &dyn Flag| {
                if flag.name() == "key.one-example" {
                    (String::new(), ConfigValue::Null)
                } else {
                    (flag.name().to_string(), flag_value(flag))
                }
            })
            .read()
            .unwrap();

        let key = map["key"].as_map("key").unwrap();
        assert_eq!(key.len(), 1);
        assert_eq!(key["int"], ConfigValue::from(123));
    }

    #[test]
    fn test_key_value_callback_takes_precedence() {
        let flags = example_flags();

        let kv_first = FlagProvider::new(&flags, ".")
            .with_key_value_callback(|key, _| (key.to_string(), ConfigValue::from("kv")))
            .with_flag_callback(|flag: &dyn Flag| (flag.name().to_string(), ConfigValue::from("flag")));
        let flag_first = FlagProvider::new(&flags, ".")
            .with_flag_callback(|flag: &dyn Flag| (flag.name().to_string(), ConfigValue::from("flag")))
            .with_key_value_callback(|key, _| (key.to_string(), ConfigValue::from("kv")));

        for provider in [kv_first, flag_first] {
            let map = provider.read().unwrap();
            let key = map["key"].as_map("key").unwrap();
            assert_eq!(key["int"], ConfigValue::from("kv"));
        }
    }

    #[test]
    fn test_custom_delimiter() {
        let mut flags = MemoryFlagSet::new("test");
        flags.string("db/host", "localhost").string("log.level", "info");

        let map = FlagProvider::new(&flags, "/").read().unwrap();
        let db = map["db"].as_map("db").unwrap();
        assert_eq!(db["host"], ConfigValue::from("localhost"));
        assert_eq!(map["log.level"], ConfigValue::from("info"));
    }

    struct Opaque;

    impl FlagValue for Opaque {}

    struct FormatOnly;

    impl FlagValue for FormatOnly {
        fn format(&self) -> Option<String> {
            Some("text".to_string())
        }
    }

    #[test]
    fn test_default_extraction_capabilities() {
        let mut flags = MemoryFlagSet::new("test");
        flags
            .int("typed", 7)
            .custom("formatted", Box::new(FormatOnly))
            .custom("opaque", Box::new(Opaque));

        let map = FlagProvider::new(&flags, ".").read().unwrap();
        assert_eq!(map["typed"], ConfigValue::from(7));
        assert_eq!(map["formatted"], ConfigValue::from("text"));
        assert_eq!(map["opaque"], ConfigValue::Null);
    }

    #[test]
    fn test_key_value_callback_gets_empty_string_for_opaque_value() {
        let mut flags = MemoryFlagSet::new("test");
        flags.custom("opaque", Box::new(Opaque));

        let map = FlagProvider::new(&flags, ".")
            .with_key_value_callback(|key, value| (key.to_string(), ConfigValue::from(value)))
            .read()
            .unwrap();
        assert_eq!(map["opaque"], ConfigValue::from(""));
    }

    #[test]
    fn test_read_is_repeatable() {
        let flags = example_flags();
        let provider = FlagProvider::new(&flags, ".");
        assert_eq!(provider.read().unwrap(), provider.read().unwrap());
    }

    #[test]
    fn test_read_empty_flag_set() {
        let flags = MemoryFlagSet::new("test");
        assert!(FlagProvider::new(&flags, ".").read().unwrap().is_empty());
    }

    #[test]
    fn test_read_bytes_unsupported() {
        let flags = example_flags();
        let result = FlagProvider::new(&flags, ".").read_bytes();
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_watch_unsupported_and_never_calls_back() {
        let flags = example_flags();
        let called = Arc::new(AtomicBool::new(false));
        let seen = called.clone();

        let result = FlagProvider::new(&flags, ".")
            .watch(Arc::new(move |_key: ConfigKey| seen.store(true, Ordering::SeqCst)));

        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedOperation { .. })
        ));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_provider_name_and_debug() {
        let flags = example_flags();
        let provider = FlagProvider::new(&flags, "::");
        assert_eq!(provider.name(), "flags");
        assert_eq!(provider.delimiter(), "::");
        let debug = format!("{:?}", provider);
        assert!(debug.contains("FlagProvider"));
        assert!(debug.contains("default"));
    }

    #[test]
    fn test_provider_over_trait_object() {
        let flags = example_flags();
        let dyn_flags: &dyn FlagSet = &flags;
        let provider = FlagProvider::new(dyn_flags, ".");
        assert_eq!(provider.read().unwrap().len(), 1);
    }
}
