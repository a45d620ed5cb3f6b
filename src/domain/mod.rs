// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module contains the core domain types for the flag adapter: keys, typed
//! values, nested maps and the conversion between flat delimited keys and nested
//! maps. It is independent of any flag-parsing library.

pub mod config_key;
pub mod config_tree;
pub mod config_value;
pub mod errors;
pub mod key_path;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_tree::ConfigTree;
pub use config_value::{ConfigMap, ConfigValue};
pub use errors::{ConfigError, Result};
