// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

// Configuration: YAML file → validated typed Config.
//
// The ledger section is deliberately optional end to end — a missing
// file or missing credentials put anchoring into the disabled state
// instead of failing startup.

mod error;
mod interpolation;
mod loader;
mod raw;
mod source;
mod types;

pub use error::ConfigError;
pub use loader::load_config;
pub use source::{ConfigSource, FileSource, StringSource};
pub use types::{Config, EngineConfig, LedgerConfig, LedgerMode, StorageConfig};
