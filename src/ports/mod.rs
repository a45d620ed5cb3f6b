// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between the adapter and its collaborators: the flag set it reads, the snapshot
//! it consults, and the provider contract it exposes to an aggregator.

pub mod flag_set;
pub mod provider;
pub mod snapshot;

// Re-export commonly used types
pub use flag_set::{Flag, FlagSet, FlagValue};
pub use provider::{ChangeCallback, ConfigProvider};
pub use snapshot::ConfigSnapshot;
