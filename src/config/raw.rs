// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

// Raw deserialization shapes for the YAML config. Everything optional
// here; validation and defaulting happen in the loader.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RawConfig {
    /// Contract version key. Always "v1".
    pub veracity: String,
    #[serde(default)]
    pub ledger: Option<RawLedger>,
    #[serde(default)]
    pub storage: Option<RawStorage>,
    #[serde(default)]
    pub engine: Option<RawEngine>,
    #[serde(default)]
    pub environment: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawLedger {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub explorer_base: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawStorage {
    #[serde(default)]
    pub registry_path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawEngine {
    #[serde(default)]
    pub max_media_bytes: Option<usize>,
}
