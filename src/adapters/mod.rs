// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing flag set and provider implementations.
//!
//! This module contains the concrete implementations of the traits defined in the
//! ports layer: the flag configuration provider itself, an in-memory flag set, and
//! a flag set backed by `clap` when the `cli` feature is enabled.

#[cfg(feature = "cli")]
pub mod cli;
pub mod flag_provider;
pub mod memory_flags;

#[cfg(feature = "cli")]
pub use cli::ClapFlagSet;
pub use flag_provider::{flag_value, FlagCallback, FlagProvider, KeyValueCallback};
pub use memory_flags::{MemoryFlag, MemoryFlagSet};
