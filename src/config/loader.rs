// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use super::error::ConfigError;
use super::interpolation::resolve_variables;
use super::raw;
use super::source::ConfigSource;
use super::types::*;

/// Load and validate a veracity config from the given source.
///
/// Steps:
/// 1. Read raw YAML from source
/// 2. Parse into raw deserialization types
/// 3. Validate version and values
/// 4. Resolve ${VAR} interpolation in ledger string fields
/// 5. Build the typed Config
pub fn load_config(source: &dyn ConfigSource) -> Result<Config, ConfigError> {
    let raw_yaml = source.load()?;
    let raw: raw::RawConfig = serde_yaml::from_str(&raw_yaml)?;

    if raw.veracity != "v1" {
        return Err(ConfigError::Validation(format!(
            "unsupported config version \"{}\", expected \"v1\"",
            raw.veracity
        )));
    }

    let ledger = build_ledger(raw.ledger.unwrap_or_default())?;

    let storage = {
        let raw_storage = raw.storage.unwrap_or_default();
        let defaults = StorageConfig::default();
        StorageConfig {
            registry_path: raw_storage
                .registry_path
                .map(PathBuf::from)
                .unwrap_or(defaults.registry_path),
        }
    };

    let engine = {
        let raw_engine = raw.engine.unwrap_or_default();
        let defaults = EngineConfig::default();
        let max_media_bytes = raw_engine.max_media_bytes.unwrap_or(defaults.max_media_bytes);
        if max_media_bytes == 0 {
            return Err(ConfigError::Validation(
                "engine.max_media_bytes must be positive".to_string(),
            ));
        }
        EngineConfig { max_media_bytes }
    };

    Ok(Config {
        ledger,
        storage,
        engine,
        environment: raw.environment.unwrap_or_else(|| "dev".to_string()),
    })
}

fn build_ledger(raw: raw::RawLedger) -> Result<LedgerConfig, ConfigError> {
    let defaults = LedgerConfig::default();

    let resolve_opt = |v: Option<String>| -> Result<Option<String>, ConfigError> {
        v.map(|s| resolve_variables(&s)).transpose()
    };

    let timeout_ms = raw.timeout_ms.unwrap_or(defaults.timeout_ms);
    if timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "ledger.timeout_ms must be positive".to_string(),
        ));
    }

    let mode = match raw.mode.as_deref() {
        None | Some("auto") => LedgerMode::Auto,
        Some("off") => LedgerMode::Off,
        Some(other) => {
            return Err(ConfigError::Validation(format!(
                "unknown ledger.mode \"{other}\", expected \"auto\" or \"off\""
            )))
        }
    };

    Ok(LedgerConfig {
        rpc_url: resolve_opt(raw.rpc_url)?,
        credential: resolve_opt(raw.credential)?,
        topic: resolve_opt(raw.topic)?,
        network: raw.network.unwrap_or(defaults.network),
        explorer_base: raw.explorer_base,
        timeout_ms,
        mode,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
