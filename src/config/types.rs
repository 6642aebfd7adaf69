use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Parsed and validated veracity config.
#[derive(Debug, Clone)]
pub struct Config {
    pub ledger: LedgerConfig,
    pub storage: StorageConfig,
    pub engine: EngineConfig,
    /// Environment label (e.g. "dev", "production").
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            storage: StorageConfig::default(),
            engine: EngineConfig::default(),
            environment: "dev".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Notarization backend configuration. All three of `rpc_url`,
/// `credential` and `topic` must be present for the anchoring service to
/// leave the disabled state; their absence is never a startup failure.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub rpc_url: Option<String>,
    pub credential: Option<String>,
    /// Contract/topic identifier the gateway anchors into.
    pub topic: Option<String>,
    pub network: String,
    pub explorer_base: Option<String>,
    /// Hard per-call deadline in milliseconds.
    pub timeout_ms: u64,
    pub mode: LedgerMode,
}

impl LedgerConfig {
    /// Whether enough options are present to construct a live client.
    pub fn is_configured(&self) -> bool {
        self.rpc_url.is_some() && self.credential.is_some() && self.topic.is_some()
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            credential: None,
            topic: None,
            network: "testnet".to_string(),
            explorer_base: None,
            timeout_ms: 8_000,
            mode: LedgerMode::Auto,
        }
    }
}

/// Operator anchoring policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerMode {
    /// Anchor when configured, fall back locally otherwise.
    Auto,
    /// Anchoring switched off entirely.
    Off,
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backing file for the evidence registry.
    pub registry_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from("data/evidence_registry.json"),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on decoded media size in bytes.
    pub max_media_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // 25 MiB covers short clips without inviting abuse.
            max_media_bytes: 25 * 1024 * 1024,
        }
    }
}
