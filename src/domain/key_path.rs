// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between flat delimited keys and nested configuration maps.
//!
//! [`unflatten`] turns `"a.b.c" -> value` pairs into `{a: {b: {c: value}}}` and
//! [`flatten`] walks a nested map back into delimited pairs.

use crate::domain::{ConfigKey, ConfigMap, ConfigValue};

/// Builds a nested map from flat `(key, value)` pairs.
///
/// Entries are applied in iteration order, so when two entries resolve to the
/// same path the later one wins. If a path has to descend through a value that
/// is not a map, that value is replaced by a map.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::key_path::unflatten;
/// use flagcfg::domain::ConfigValue;
///
/// let nested = unflatten(vec![("a.b.c".to_string(), ConfigValue::from(1))], ".");
/// let a = nested["a"].as_map("a").unwrap();
/// let b = a["b"].as_map("a.b").unwrap();
/// assert_eq!(b["c"], ConfigValue::from(1));
/// ```
pub fn unflatten<I>(entries: I, delimiter: &str) -> ConfigMap
where
    I: IntoIterator<Item = (String, ConfigValue)>,
{
    let mut root = ConfigMap::new();
    for (key, value) in entries {
        let key = ConfigKey::from(key);
        let segments = key.segments(delimiter);
        if let Some((leaf, parents)) = segments.split_last() {
            insert(&mut root, parents, leaf, value, &key);
        }
    }
    root
}

fn insert(node: &mut ConfigMap, parents: &[&str], leaf: &str, value: ConfigValue, key: &ConfigKey) {
    let Some((segment, rest)) = parents.split_first() else {
        node.insert(leaf.to_string(), value);
        return;
    };

    let slot = node
        .entry((*segment).to_string())
        .or_insert_with(|| ConfigValue::Map(ConfigMap::new()));
    if !matches!(slot, ConfigValue::Map(_)) {
        tracing::debug!(
            "Replacing {} value at segment '{}' with a map to place key '{}'",
            slot.kind(),
            segment,
            key
        );
        *slot = ConfigValue::Map(ConfigMap::new());
    }
    if let ConfigValue::Map(child) = slot {
        insert(child, rest, leaf, value, key);
    }
}

/// Flattens a nested map into delimited `(key, value)` pairs.
///
/// Non-empty maps are descended into; every other value, including an empty
/// map, is emitted as a leaf. The pairs come out in key order.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::key_path::{flatten, unflatten};
/// use flagcfg::domain::ConfigValue;
///
/// let flat = vec![
///     ("key.int".to_string(), ConfigValue::from(123)),
///     ("key.one-example".to_string(), ConfigValue::from("val1")),
/// ];
/// assert_eq!(flatten(&unflatten(flat.clone(), "."), "."), flat);
/// ```
pub fn flatten(map: &ConfigMap, delimiter: &str) -> Vec<(String, ConfigValue)> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    flatten_into(map, delimiter, &mut path, &mut out);
    out
}

fn flatten_into<'m>(
    map: &'m ConfigMap,
    delimiter: &str,
    path: &mut Vec<&'m str>,
    out: &mut Vec<(String, ConfigValue)>,
) {
    for (segment, value) in map {
        path.push(segment);
        match value {
            ConfigValue::Map(child) if !child.is_empty() => {
                flatten_into(child, delimiter, path, out);
            }
            leaf => {
                let key = ConfigKey::from_segments(path.iter(), delimiter);
                out.push((key.into_string(), leaf.clone()));
            }
        }
        path.pop();
    }
}
