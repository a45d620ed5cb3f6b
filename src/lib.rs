// SPDX-License-Identifier: MIT OR Apache-2.0

//! A configuration provider that reads parsed command-line flags.
//!
//! This crate turns an already parsed flag set into a nested configuration map that
//! can be merged with configuration from other sources. Flag names are split on a
//! delimiter into key paths, so `--server.port=9090` yields `{server: {port: 9090}}`.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and logic (`ConfigKey`, `ConfigValue`, `ConfigTree`, errors)
//! - **Ports**: Trait definitions that define interfaces (`FlagSet`, `ConfigSnapshot`, `ConfigProvider`)
//! - **Adapters**: The flag provider and flag set implementations (in-memory, `clap`)
//!
//! # Merge Policy
//!
//! Flags the user set explicitly always reach the output. Flags left at their
//! defaults are dropped when a snapshot of earlier configuration already holds the
//! same key, so defaults never clobber values loaded from a file.
//!
//! # Feature Flags
//!
//! - `yaml`: Enable loading snapshots from YAML and unmarshalling into structs (default)
//! - `cli`: Enable the `clap` backed flag set (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use flagcfg::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut flags = MemoryFlagSet::new("app");
//! flags.string("log.level", "info").int("server.port", 8080);
//! flags.set("server.port", 9090)?;
//!
//! let map = FlagProvider::new(&flags, ".").read()?;
//! let tree = ConfigTree::from_map(map, ".");
//! assert_eq!(tree.get("server.port"), Some(&ConfigValue::from(9090)));
//! assert_eq!(tree.get("log.level"), Some(&ConfigValue::from("info")));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{flag_value, FlagProvider, MemoryFlagSet};
    pub use crate::domain::{ConfigError, ConfigKey, ConfigMap, ConfigTree, ConfigValue, Result};
    pub use crate::ports::{ConfigProvider, ConfigSnapshot, Flag, FlagSet, FlagValue};

    #[cfg(feature = "cli")]
    pub use crate::adapters::ClapFlagSet;
}
